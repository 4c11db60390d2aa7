use serde::{Deserialize, Serialize};

/// Progress of one bulk certificate batch.
///
/// Sent by the intake submission controller over an mpsc channel while the
/// batch is being written to the record store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// The destructive clear has not been issued yet.
    Pending,
    /// Existing certificates were cleared; no row created yet.
    Cleared,
    /// Number of rows created so far.
    InProgress(u32),
    /// Every row was created. Contains the total.
    Completed(u32),
    /// The batch halted. Contains the reason, already naming the offending row.
    Failed(String),
}
