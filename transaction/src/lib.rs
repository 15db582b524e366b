//! flashlab transaction engine
//!
//! All-or-nothing mutation of a set of participants.
//!
//! Responsibilities:
//! - Capture every participant's state on entry (one snapshot per run)
//! - Run the optional pre-check, the caller's body and the optional post-check
//! - Restore every participant when a check rejects or the body fails
//! - Hand before/after attribute snapshots to an optional commit hook whose
//!   failures never change the outcome

mod error;
mod manager;
mod participants;
mod snapshot;
mod verdict;

pub use error::{CheckStage, TransactionError, POST_CHECK_FAILED, PRE_CHECK_FAILED};
pub use manager::Transaction;
pub use participants::Participants;
pub use snapshot::Snapshot;
pub use verdict::Verdict;
