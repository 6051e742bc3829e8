use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the scheduling core.
///
/// Missing data (no progress record, no translations, empty candidate pool) is
/// never an error: queries return `None`/empty and callers move to the next
/// strategy. Errors are reserved for collaborator failures and coordination
/// bugs.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The reconcile pass loaded a unit that disappeared before the
    /// write-back. Indicates a coordination bug, not an expected empty state.
    #[error("unit vanished during reconciliation: {0}")]
    UnitVanished(String),
}
