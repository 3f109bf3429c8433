//! Web server adapter.
//!
//! Axum JSON API: authentication and account management plus the ticker
//! resolution endpoints, versioned under `/api/v1`.

mod auth;
mod error;
mod handlers;
mod schemas;

pub use auth::{hash_password, verify_password, CurrentUser, TokenSigner};
pub use error::ApiError;
pub use schemas::*;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::adapters::email::EmailSettings;
use crate::ports::mail_port::MailPort;
use crate::ports::ticker_store::TickerStore;
use crate::ports::user_store::UserStore;

pub struct AppState {
    pub user_store: Arc<dyn UserStore + Send + Sync>,
    pub ticker_store: Arc<dyn TickerStore + Send + Sync>,
    pub mailer: Arc<dyn MailPort + Send + Sync>,
    pub tokens: TokenSigner,
    pub email_settings: EmailSettings,
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/confirm-signup", get(handlers::confirm_signup))
        .route(
            "/auth/login/access-token",
            post(handlers::login_access_token),
        )
        .route(
            "/auth/reset-password/{email}",
            post(handlers::send_password_reset),
        )
        .route("/auth/reset-password", post(handlers::reset_password))
        .route(
            "/admin/auth/activate-account",
            patch(handlers::admin_activate_account),
        )
        .route(
            "/user/me",
            get(handlers::read_user_me)
                .patch(handlers::update_user_me)
                .delete(handlers::delete_user_me),
        )
        .route("/user/me/password", patch(handlers::update_password_me))
        .route(
            "/admin/user",
            get(handlers::admin_list_users).post(handlers::admin_create_user),
        )
        .route(
            "/admin/user/{user_id}",
            get(handlers::admin_read_user)
                .patch(handlers::admin_update_user)
                .delete(handlers::admin_delete_user),
        )
        .route(
            "/ticker",
            get(handlers::list_tickers).post(handlers::create_ticker),
        )
        .route(
            "/ticker/{code}",
            get(handlers::get_ticker).patch(handlers::update_ticker),
        );

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
