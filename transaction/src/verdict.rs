//! Check verdicts.
//!
//! Pre- and post-checks report through a single type. A check may return a
//! plain `bool` (false becomes a reason-less rejection, and the engine fills
//! in which check failed) or a `Verdict` carrying its own reason.

/// Outcome of a pre- or post-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The check passed.
    Accept,
    /// The check failed without an explanation.
    Reject,
    /// The check failed with an explanation.
    RejectWith(String),
}

impl Verdict {
    /// Reject with a reason.
    pub fn reject(reason: impl Into<String>) -> Self {
        Verdict::RejectWith(reason.into())
    }

    /// Accept when `condition` holds, otherwise reject with `reason`.
    pub fn require(condition: bool, reason: impl Into<String>) -> Self {
        if condition {
            Verdict::Accept
        } else {
            Verdict::reject(reason)
        }
    }

    /// Returns true if the check passed.
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// Chain another check; the first rejection wins.
    pub fn and_then<F, V>(self, next: F) -> Verdict
    where
        F: FnOnce() -> V,
        V: Into<Verdict>,
    {
        match self {
            Verdict::Accept => next().into(),
            rejected => rejected,
        }
    }

    /// The rejection reason, using `default` for reason-less rejections.
    pub(crate) fn rejection(self, default: &str) -> Option<String> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject => Some(default.to_string()),
            Verdict::RejectWith(reason) => Some(reason),
        }
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}

impl From<Result<(), String>> for Verdict {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Verdict::Accept,
            Err(reason) => Verdict::RejectWith(reason),
        }
    }
}
