//! Transaction error types.

use thiserror::Error;

/// Reason recorded when a pre-check returns false.
pub const PRE_CHECK_FAILED: &str = "pre-check failed";

/// Reason recorded when a post-check returns false.
pub const POST_CHECK_FAILED: &str = "post-check failed";

/// Which check rejected a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    PreCheck,
    PostCheck,
}

impl CheckStage {
    /// Reason used when the check gave none.
    pub fn default_reason(&self) -> &'static str {
        match self {
            CheckStage::PreCheck => PRE_CHECK_FAILED,
            CheckStage::PostCheck => POST_CHECK_FAILED,
        }
    }
}

/// Transaction errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// A check rejected the transaction; every participant was restored.
    #[error("transaction '{name}' aborted: {reason}")]
    Aborted {
        name: String,
        stage: CheckStage,
        reason: String,
    },
}

impl TransactionError {
    pub fn aborted(name: impl Into<String>, stage: CheckStage, reason: impl Into<String>) -> Self {
        Self::Aborted {
            name: name.into(),
            stage,
            reason: reason.into(),
        }
    }

    /// Pre-check rejection without a custom reason.
    pub fn pre_check_failed(name: impl Into<String>) -> Self {
        Self::aborted(name, CheckStage::PreCheck, PRE_CHECK_FAILED)
    }

    /// Post-check rejection without a custom reason.
    pub fn post_check_failed(name: impl Into<String>) -> Self {
        Self::aborted(name, CheckStage::PostCheck, POST_CHECK_FAILED)
    }

    /// Name of the transaction that was aborted.
    pub fn name(&self) -> &str {
        match self {
            Self::Aborted { name, .. } => name,
        }
    }

    /// Why the transaction was aborted.
    pub fn reason(&self) -> &str {
        match self {
            Self::Aborted { reason, .. } => reason,
        }
    }

    /// Which check rejected the transaction.
    pub fn stage(&self) -> CheckStage {
        match self {
            Self::Aborted { stage, .. } => *stage,
        }
    }

    /// Returns true if the pre-check rejected the transaction.
    pub fn is_pre_check_failure(&self) -> bool {
        self.stage() == CheckStage::PreCheck
    }
}
