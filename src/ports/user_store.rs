//! User persistence port trait.

use uuid::Uuid;

use crate::domain::error::FauxtickError;
use crate::domain::user::User;

/// A page of users together with the total row count.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub count: usize,
}

pub trait UserStore {
    /// Insert a new account. Duplicate emails are a conflict.
    fn insert(&self, user: &User) -> Result<(), FauxtickError>;

    fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, FauxtickError>;

    fn get_by_email(&self, email: &str) -> Result<Option<User>, FauxtickError>;

    fn list(&self, skip: usize, limit: usize) -> Result<UserPage, FauxtickError>;

    /// Write all mutable columns of an existing account.
    fn update(&self, user: &User) -> Result<(), FauxtickError>;

    /// Flip `is_active` on. Returns the refreshed account, or None when the
    /// id is unknown.
    fn activate(&self, user_id: Uuid) -> Result<Option<User>, FauxtickError>;

    /// Delete an account; owned tickers go with it.
    fn delete(&self, user_id: Uuid) -> Result<(), FauxtickError>;
}
