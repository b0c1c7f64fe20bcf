//! vnreader-batch - sequential AI processing over selected sentences
//!
//! A [`BatchRunner`] works through one action (reading, translation,
//! explanation or reading check) for each selected sentence in ascending
//! order. The run can be paused, resumed and cancelled through its
//! [`BatchControl`]. Results are held for review in a [`BatchSession`] and
//! written back only on an explicit apply.

pub mod control;
pub mod error;
pub mod runner;
pub mod session;
pub mod types;

pub use control::{BatchControl, BatchState};
pub use error::{BatchError, ParseActionError};
pub use runner::{BatchRunner, RunnerConfig};
pub use session::{apply_results, ApplyOutcome, ApplySummary, BatchSession};
pub use types::*;
