//! User account management integration tests.
//!
//! Tests cover:
//! - /user/me read, update, password change, delete
//! - Email conflicts on update
//! - Superuser management routes and their privilege guards

mod common;

use axum::http::StatusCode;
use fauxtick::ports::ticker_store::TickerStore;
use fauxtick::ports::user_store::UserStore;
use serde_json::json;
use tower::ServiceExt;

use common::*;

mod me_tests {
    use super::*;

    #[tokio::test]
    async fn me_returns_public_projection_only() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .oneshot(authed_request("GET", "/api/v1/user/me", &token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["first_name"], "Test");
        assert!(body.get("hashed_password").is_none());
    }

    #[tokio::test]
    async fn update_me_merges_named_fields() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .clone()
            .oneshot(authed_json_request(
                "PATCH",
                "/api/v1/user/me",
                &token,
                &json!({ "first_name": "Ada", "email": "countess@example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["first_name"], "Ada");
        assert_eq!(body["last_name"], "User");
        assert_eq!(body["email"], "countess@example.com");

        let stored = app
            .store
            .get_by_email("countess@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, user.id);
    }

    #[tokio::test]
    async fn update_me_to_taken_email_conflicts() {
        let app = create_test_app();
        seed_user(&app, "taken@example.com", "password123", true, false);
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .oneshot(authed_json_request(
                "PATCH",
                "/api/v1/user/me",
                &token,
                &json!({ "email": "taken@example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn update_me_keeping_own_email_is_allowed() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .oneshot(authed_json_request(
                "PATCH",
                "/api/v1/user/me",
                &token,
                &json!({ "email": "ada@example.com", "last_name": "Lovelace" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

mod password_tests {
    use super::*;

    #[tokio::test]
    async fn change_password_then_login_with_new_one() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .clone()
            .oneshot(authed_json_request(
                "PATCH",
                "/api/v1/user/me/password",
                &token,
                &json!({
                    "current_password": "enchantress1843",
                    "new_password": "analytical1852",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .router
            .clone()
            .oneshot(login_request("ada@example.com", "analytical1852"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .router
            .oneshot(login_request("ada@example.com", "enchantress1843"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn change_password_with_wrong_current_is_rejected() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .oneshot(authed_json_request(
                "PATCH",
                "/api/v1/user/me/password",
                &token,
                &json!({
                    "current_password": "wrongpassword",
                    "new_password": "analytical1852",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unchanged_password_is_rejected() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .oneshot(authed_json_request(
                "PATCH",
                "/api/v1/user/me/password",
                &token,
                &json!({
                    "current_password": "enchantress1843",
                    "new_password": "enchantress1843",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn delete_me_removes_account_and_owned_tickers() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/ticker",
                &token,
                &json!({
                    "ticker_code": "HHHB",
                    "name": "Hydra Holdings",
                    "drift": 3.5,
                    "volatility": 22.0,
                    "jump_intensity": 1.2,
                    "jump_mean": 0.4,
                    "jump_std_dev": 2.1,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .router
            .oneshot(authed_request("DELETE", "/api/v1/user/me", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert!(app.store.get_by_id(user.id).unwrap().is_none());
        assert!(app.store.list_by_owner(user.id).unwrap().is_empty());
    }
}

mod admin_tests {
    use super::*;

    #[tokio::test]
    async fn admin_routes_require_superuser() {
        let app = create_test_app();
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &user);

        let response = app
            .router
            .clone()
            .oneshot(authed_request("GET", "/api/v1/admin/user", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .router
            .oneshot(authed_request(
                "GET",
                &format!("/api/v1/admin/user/{}", user.id),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_list_pages_users_with_count() {
        let app = create_test_app();
        let admin = seed_user(&app, "root@example.com", "sup3ruser-pw", true, true);
        for i in 0..4 {
            seed_user(&app, &format!("user{i}@example.com"), "password123", true, false);
        }
        let token = token_for(&app, &admin);

        let response = app
            .router
            .oneshot(authed_request(
                "GET",
                "/api/v1/admin/user?skip=0&limit=3",
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 5);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn admin_creates_user_with_flags() {
        let app = create_test_app();
        let admin = seed_user(&app, "root@example.com", "sup3ruser-pw", true, true);
        let token = token_for(&app, &admin);

        let response = app
            .router
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/admin/user",
                &token,
                &json!({
                    "email": "ada@example.com",
                    "password": "enchantress1843",
                    "is_active": true,
                    "is_superuser": false,
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["is_active"], true);

        // The manually created account can log in immediately.
        let response = app
            .router
            .oneshot(login_request("ada@example.com", "enchantress1843"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_read_unknown_user_is_not_found() {
        let app = create_test_app();
        let admin = seed_user(&app, "root@example.com", "sup3ruser-pw", true, true);
        let token = token_for(&app, &admin);

        let response = app
            .router
            .oneshot(authed_request(
                "GET",
                &format!("/api/v1/admin/user/{}", uuid::Uuid::new_v4()),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_update_can_rotate_password() {
        let app = create_test_app();
        let admin = seed_user(&app, "root@example.com", "sup3ruser-pw", true, true);
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &admin);

        let response = app
            .router
            .clone()
            .oneshot(authed_json_request(
                "PATCH",
                &format!("/api/v1/admin/user/{}", user.id),
                &token,
                &json!({ "password": "analytical1852", "first_name": "Ada" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .router
            .oneshot(login_request("ada@example.com", "analytical1852"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn superuser_cannot_delete_themselves() {
        let app = create_test_app();
        let admin = seed_user(&app, "root@example.com", "sup3ruser-pw", true, true);
        let token = token_for(&app, &admin);

        let response = app
            .router
            .oneshot(authed_request(
                "DELETE",
                &format!("/api/v1/admin/user/{}", admin.id),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_deletes_other_user() {
        let app = create_test_app();
        let admin = seed_user(&app, "root@example.com", "sup3ruser-pw", true, true);
        let user = seed_user(&app, "ada@example.com", "enchantress1843", true, false);
        let token = token_for(&app, &admin);

        let response = app
            .router
            .oneshot(authed_request(
                "DELETE",
                &format!("/api/v1/admin/user/{}", user.id),
                &token,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(app.store.get_by_id(user.id).unwrap().is_none());
    }
}
