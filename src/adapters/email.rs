//! Email content generation.
//!
//! Renders the account-confirmation and password-reset messages from HTML
//! templates. Delivery itself goes through the mail port.

use askama::Template;

use crate::domain::error::FauxtickError;
use crate::domain::user::User;
use crate::ports::config_port::ConfigPort;

const PROJECT_NAME: &str = "FauxTick";

const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000";
const DEFAULT_CONFIRMATION_TOKEN_HOURS: i64 = 24;
const DEFAULT_RESET_TOKEN_HOURS: i64 = 24;

/// A rendered message, ready for the mail port.
#[derive(Debug, Clone)]
pub struct EmailData {
    pub subject: String,
    pub html_body: String,
}

/// Settings shared by all outgoing email.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub public_url: String,
    pub from_name: String,
    pub from_email: String,
    pub confirmation_token_hours: i64,
    pub reset_token_hours: i64,
}

impl EmailSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self {
            public_url: config
                .get_string("server", "public_url")
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string()),
            from_name: config
                .get_string("email", "from_name")
                .unwrap_or_else(|| PROJECT_NAME.to_string()),
            from_email: config
                .get_string("email", "from_email")
                .unwrap_or_else(|| "no-reply@fauxtick.example".to_string()),
            confirmation_token_hours: config.get_int(
                "auth",
                "confirmation_token_hours",
                DEFAULT_CONFIRMATION_TOKEN_HOURS,
            ),
            reset_token_hours: config.get_int("auth", "reset_token_hours", DEFAULT_RESET_TOKEN_HOURS),
        }
    }
}

#[derive(Template)]
#[template(path = "account_confirmation.html")]
struct AccountConfirmationTemplate<'a> {
    project_name: &'a str,
    first_name: &'a str,
    link: &'a str,
    valid_hours: i64,
}

#[derive(Template)]
#[template(path = "reset_password.html")]
struct ResetPasswordTemplate<'a> {
    project_name: &'a str,
    first_name: &'a str,
    link: &'a str,
    valid_hours: i64,
}

pub fn generate_account_confirmation_email(
    settings: &EmailSettings,
    user: &User,
    token: &str,
) -> Result<EmailData, FauxtickError> {
    let link = format!("{}/confirm-signup?token={token}", settings.public_url);
    let template = AccountConfirmationTemplate {
        project_name: PROJECT_NAME,
        first_name: &user.first_name,
        link: &link,
        valid_hours: settings.confirmation_token_hours,
    };
    let html_body = template
        .render()
        .map_err(|e| FauxtickError::EmailRender {
            reason: e.to_string(),
        })?;

    Ok(EmailData {
        subject: format!("{PROJECT_NAME} - Account Confirmation"),
        html_body,
    })
}

pub fn generate_password_reset_email(
    settings: &EmailSettings,
    user: &User,
    token: &str,
) -> Result<EmailData, FauxtickError> {
    let link = format!("{}/reset-password?token={token}", settings.public_url);
    let template = ResetPasswordTemplate {
        project_name: PROJECT_NAME,
        first_name: &user.first_name,
        link: &link,
        valid_hours: settings.reset_token_hours,
    };
    let html_body = template
        .render()
        .map_err(|e| FauxtickError::EmailRender {
            reason: e.to_string(),
        })?;

    Ok(EmailData {
        subject: format!("{PROJECT_NAME} - Password Reset Request"),
        html_body,
    })
}
