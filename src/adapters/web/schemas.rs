//! Request and response payloads for the JSON API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserPublic;

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmSignupQuery {
    pub token: String,
}

/// OAuth2-style password grant form: `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewPassword {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdateMe {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminUserCreate {
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminUserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersPublic {
    pub data: Vec<UserPublic>,
    pub count: usize,
}

fn default_list_limit() -> usize {
    100
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct ActivateAccountQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TickerCreate {
    pub ticker_code: String,
    pub name: String,
    pub description: Option<String>,
    pub sector: Option<String>,
    pub drift: f64,
    pub volatility: f64,
    pub jump_intensity: f64,
    pub jump_mean: f64,
    pub jump_std_dev: f64,
}

#[derive(Debug, Deserialize, Default)]
pub struct TickerPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sector: Option<String>,
    pub drift: Option<f64>,
    pub volatility: Option<f64>,
    pub jump_intensity: Option<f64>,
    pub jump_mean: Option<f64>,
    pub jump_std_dev: Option<f64>,
}
