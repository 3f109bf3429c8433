//! User-defined ticker persistence port trait.

use uuid::Uuid;

use crate::domain::error::FauxtickError;
use crate::domain::ticker::UserDefinedTicker;

pub trait TickerStore {
    /// Insert a new ticker and return it with its assigned row id. A
    /// duplicate (owner, code) pair is a conflict; under concurrent creation
    /// the storage-level uniqueness constraint is what serializes the race.
    fn insert(&self, ticker: &UserDefinedTicker) -> Result<UserDefinedTicker, FauxtickError>;

    /// Point lookup by (owner, code).
    fn get_by_owner_and_code(
        &self,
        owner_id: Uuid,
        code: &str,
    ) -> Result<Option<UserDefinedTicker>, FauxtickError>;

    fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<UserDefinedTicker>, FauxtickError>;

    /// Write all mutable columns of an existing ticker row.
    fn update(&self, ticker: &UserDefinedTicker) -> Result<(), FauxtickError>;
}
