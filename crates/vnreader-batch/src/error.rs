//! Batch error types

use thiserror::Error;

/// Whole-batch errors, raised before any task runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// Nothing selected
    #[error("No sentences selected")]
    EmptySelection,

    /// No API credential configured
    #[error("API key not configured")]
    MissingCredential,

    /// A batch is already running on this control
    #[error("A batch is already running")]
    AlreadyRunning,
}

/// Unknown action name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown action: {0} (expected reading, meaning, memo or verification)")]
pub struct ParseActionError(pub String);
