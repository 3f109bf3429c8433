//! Request field validation.
//!
//! All checks reject before any storage access and return
//! [`FauxtickError::Validation`].

use crate::domain::error::FauxtickError;

pub const EMAIL_MAX_LEN: usize = 255;
pub const NAME_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 40;

/// Structural email check: one '@', non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), FauxtickError> {
    if email.is_empty() || email.len() > EMAIL_MAX_LEN {
        return Err(FauxtickError::Validation {
            reason: format!("email must be 1-{EMAIL_MAX_LEN} characters"),
        });
    }
    if email.chars().any(char::is_whitespace) {
        return Err(FauxtickError::Validation {
            reason: "email must not contain whitespace".to_string(),
        });
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(FauxtickError::Validation {
            reason: format!("invalid email address: {email:?}"),
        });
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(FauxtickError::Validation {
            reason: format!("invalid email address: {email:?}"),
        });
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), FauxtickError> {
    if password.len() < PASSWORD_MIN_LEN || password.len() > PASSWORD_MAX_LEN {
        return Err(FauxtickError::Validation {
            reason: format!("password must be {PASSWORD_MIN_LEN}-{PASSWORD_MAX_LEN} characters"),
        });
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> Result<(), FauxtickError> {
    if value.is_empty() || value.len() > NAME_MAX_LEN {
        return Err(FauxtickError::Validation {
            reason: format!("{field} must be 1-{NAME_MAX_LEN} characters"),
        });
    }
    Ok(())
}
