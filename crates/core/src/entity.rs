//! Contract every CRUD-managed entity record fulfils.

use crate::error::CoreError;
use crate::types::DbId;

/// A server-managed entity record.
///
/// Implementors are plain serde data holders; the generic entity client
/// relies on this trait for id bookkeeping, log/error labels, and the
/// ordering of the locally cached list.
pub trait EntityInfo {
    /// Entity label used in logs and error messages, e.g. `"work zone"`.
    const ENTITY: &'static str;

    /// Server-assigned id, `None` until the record has been inserted.
    fn id(&self) -> Option<DbId>;

    /// Record the server-assigned id after an insert.
    fn set_id(&mut self, id: DbId);

    /// Ordering key for the cached list.
    ///
    /// Chronological entities sort by their start timestamp (wire format
    /// sorts lexicographically), named entities by name.
    fn sort_key(&self) -> String;

    /// Client-side checks before insert/update.
    ///
    /// The server re-validates; this only catches forms that would be
    /// rejected anyway.  Read-only entities keep the default.
    fn check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
