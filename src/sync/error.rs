//! Error types for run-level sync operations.
//!
//! Per-chapter and per-series failures are recorded in the
//! [`RunReport`](super::RunReport) instead; these errors abort the operation.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that stop a sync, watch or discovery operation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// State store access failed.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
}
