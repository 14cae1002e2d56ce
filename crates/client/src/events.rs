//! Outcome events published by the clients.
//!
//! Each client owns a `tokio::sync::broadcast` channel; panels subscribe
//! and react to whatever outcome arrives, whether the operation was
//! awaited in place or dispatched onto a background task.

use std::path::PathBuf;

use tetres_core::DbId;

/// Outcome of an entity-client operation.
///
/// Failure variants carry the rendered error text; the cached list is
/// already updated by the time a success variant is observed.
#[derive(Debug, Clone)]
pub enum DataEvent<T> {
    ListUpdated { count: usize },
    ListFailed { error: String },
    Fetched { item: Box<T> },
    FetchFailed { error: String },
    Inserted { id: DbId },
    InsertFailed { error: String },
    InsertedAll { count: usize },
    InsertAllFailed { error: String },
    Updated { id: DbId },
    UpdateFailed { error: String },
    Deleted { ids: Vec<DbId> },
    DeleteFailed { error: String },
    YearsLoaded { years: Vec<i32> },
    YearsFailed { error: String },
}

/// Progress of an estimation job.
#[derive(Debug, Clone)]
pub enum JobEvent {
    Submitted { uid: String },
    /// One result poll completed; the job is still running.
    Polled { uid: String, attempt: u32 },
    Ready { uid: String },
    Downloaded { uid: String, output_dir: PathBuf },
    Failed { uid: String, error: String },
    Cancelled { uid: String },
}
