#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};

use fauxtick::adapters::email::EmailSettings;
use fauxtick::adapters::sqlite_adapter::SqliteAdapter;
use fauxtick::adapters::web::{build_router, hash_password, AppState, TokenSigner};
use fauxtick::domain::error::FauxtickError;
use fauxtick::domain::user::User;
use fauxtick::ports::mail_port::MailPort;
use fauxtick::ports::ticker_store::TickerStore;
use fauxtick::ports::user_store::UserStore;

pub const TEST_SECRET: [u8; 32] = [7; 32];

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Mail adapter that records messages so tests can pull tokens out of them.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<SentMail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl MailPort for RecordingMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), FauxtickError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteAdapter>,
    pub mailer: RecordingMailer,
    pub tokens: TokenSigner,
}

pub fn create_test_app() -> TestApp {
    let store = Arc::new(SqliteAdapter::in_memory().unwrap());
    store.initialize_schema().unwrap();

    let tokens = TokenSigner::new(
        &TEST_SECRET,
        Duration::minutes(60),
        Duration::hours(24),
        Duration::hours(24),
    );
    let mailer = RecordingMailer::default();

    let state = AppState {
        user_store: store.clone() as Arc<dyn UserStore + Send + Sync>,
        ticker_store: store.clone() as Arc<dyn TickerStore + Send + Sync>,
        mailer: Arc::new(mailer.clone()),
        tokens: tokens.clone(),
        email_settings: EmailSettings {
            public_url: "http://testserver".to_string(),
            from_name: "FauxTick".to_string(),
            from_email: "no-reply@fauxtick.example".to_string(),
            confirmation_token_hours: 24,
            reset_token_hours: 24,
        },
    };

    TestApp {
        router: build_router(state),
        store,
        mailer,
        tokens,
    }
}

/// Insert a user directly into the store, bypassing the signup flow.
pub fn seed_user(
    app: &TestApp,
    email: &str,
    password: &str,
    is_active: bool,
    is_superuser: bool,
) -> User {
    let user = User::new(
        email.to_string(),
        hash_password(password).unwrap(),
        "Test".to_string(),
        "User".to_string(),
        is_active,
        is_superuser,
    );
    UserStore::insert(app.store.as_ref(), &user).unwrap();
    user
}

/// Issue a bearer access token for a seeded user.
pub fn token_for(app: &TestApp, user: &User) -> String {
    app.tokens
        .issue(&user.id.to_string(), Duration::minutes(60))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn form_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    form_request(
        "/api/v1/auth/login/access-token",
        format!("username={email}&password={password}"),
    )
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pull the `token=` value out of a rendered email body.
pub fn extract_token(html: &str) -> String {
    let start = html.find("token=").expect("email contains a token link") + "token=".len();
    html[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}
