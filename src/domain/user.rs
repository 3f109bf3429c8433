//! User account entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Construct a new account. Accounts start with fresh timestamps; the
    /// caller decides activation and privilege flags.
    pub fn new(
        email: String,
        hashed_password: String,
        first_name: String,
        last_name: String,
        is_active: bool,
        is_superuser: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            hashed_password,
            is_active,
            is_superuser,
            first_name,
            last_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge an update into this account: each present field is assigned in
    /// declaration order, then `updated_at` is refreshed.
    pub fn apply_update(&mut self, update: &UserUpdate) {
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(hashed_password) = &update.hashed_password {
            self.hashed_password = hashed_password.clone();
        }
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Optional-field account update. The password arrives pre-hashed; the
/// domain never sees plaintext secrets.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Public projection of an account, safe to serialize to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_active: user.is_active,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}
