//! Domain error types.

/// Top-level error type for fauxtick.
#[derive(Debug, thiserror::Error)]
pub enum FauxtickError {
    #[error("validation error: {reason}")]
    Validation { reason: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("conflict: {reason}")]
    Conflict { reason: String },

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("inactive user")]
    InactiveUser,

    #[error("could not validate credentials")]
    InvalidToken,

    #[error("insufficient privileges")]
    Forbidden,

    #[error("password hash error: {reason}")]
    PasswordHash { reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("email render error: {reason}")]
    EmailRender { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FauxtickError> for std::process::ExitCode {
    fn from(err: &FauxtickError) -> Self {
        let code: u8 = match err {
            FauxtickError::Io(_) => 1,
            FauxtickError::ConfigParse { .. }
            | FauxtickError::ConfigMissing { .. }
            | FauxtickError::ConfigInvalid { .. } => 2,
            FauxtickError::Database { .. } | FauxtickError::DatabaseQuery { .. } => 3,
            FauxtickError::Validation { .. }
            | FauxtickError::NotFound { .. }
            | FauxtickError::Conflict { .. } => 4,
            FauxtickError::InvalidCredentials
            | FauxtickError::InactiveUser
            | FauxtickError::InvalidToken
            | FauxtickError::Forbidden
            | FauxtickError::PasswordHash { .. } => 5,
            FauxtickError::EmailRender { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
