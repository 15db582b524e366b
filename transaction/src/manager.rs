//! Scoped transactions over a participant set.

use std::panic::{self, AssertUnwindSafe};

use crate::error::{CheckStage, TransactionError};
use crate::participants::Participants;
use crate::snapshot::Snapshot;
use crate::verdict::Verdict;

type Check<'a, P> = Box<dyn Fn(&P) -> Verdict + 'a>;
type CommitHook<'a> = Box<dyn FnOnce(&Snapshot, &Snapshot) -> anyhow::Result<()> + 'a>;

/// A single all-or-nothing unit of work.
///
/// The transaction borrows its participants for the duration of [`run`]
/// and owns nothing but the entry snapshot, so a body is free to open another
/// transaction over a subset of its own participants.
///
/// [`run`]: Transaction::run
pub struct Transaction<'a, P: Participants> {
    name: String,
    participants: P,
    pre_check: Option<Check<'a, P>>,
    post_check: Option<Check<'a, P>>,
    on_commit: Option<CommitHook<'a>>,
}

impl<'a, P: Participants> Transaction<'a, P> {
    /// Create a transaction over an ordered participant set.
    pub fn new(name: impl Into<String>, participants: P) -> Self {
        Self {
            name: name.into(),
            participants,
            pre_check: None,
            post_check: None,
            on_commit: None,
        }
    }

    /// Get the transaction name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the participants after the snapshot and before the body.
    pub fn pre_check<F, V>(mut self, check: F) -> Self
    where
        F: Fn(&P) -> V + 'a,
        V: Into<Verdict>,
    {
        self.pre_check = Some(Box::new(move |p: &P| -> Verdict { check(p).into() }));
        self
    }

    /// Validate the participants after the body and before commit.
    pub fn post_check<F, V>(mut self, check: F) -> Self
    where
        F: Fn(&P) -> V + 'a,
        V: Into<Verdict>,
    {
        self.post_check = Some(Box::new(move |p: &P| -> Verdict { check(p).into() }));
        self
    }

    /// Observe the before/after attribute snapshots of a committed run.
    ///
    /// Errors and panics raised by the hook are discarded.
    pub fn on_commit<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&Snapshot, &Snapshot) -> anyhow::Result<()> + 'a,
    {
        self.on_commit = Some(Box::new(hook));
        self
    }

    /// Run `body` against the participants.
    ///
    /// Every participant is back at its entry state when this returns an
    /// error, whether the error came from a check or from the body. A body
    /// error is returned as is. A panicking body or check is rolled back
    /// before the panic resumes.
    pub fn run<R, E, F>(self, body: F) -> Result<R, E>
    where
        F: FnOnce(&mut P) -> Result<R, E>,
        E: From<TransactionError>,
    {
        let Transaction {
            name,
            mut participants,
            pre_check,
            post_check,
            on_commit,
        } = self;

        let saved = participants.save();
        let before = on_commit.as_ref().map(|_| participants.capture());
        log::trace!("tx '{}': begin with {} participants", name, participants.count());

        if let Some(check) = &pre_check {
            judge(&name, CheckStage::PreCheck, check, &mut participants, &saved)?;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut participants)));
        let value = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                participants.restore(&saved);
                log::debug!("tx '{}': rolled back (body failed)", name);
                return Err(err);
            }
            Err(payload) => {
                participants.restore(&saved);
                log::debug!("tx '{}': rolled back (body panicked)", name);
                panic::resume_unwind(payload);
            }
        };

        if let Some(check) = &post_check {
            judge(&name, CheckStage::PostCheck, check, &mut participants, &saved)?;
        }

        log::trace!("tx '{}': committed", name);

        if let (Some(hook), Some(before)) = (on_commit, before) {
            let after = participants.capture();
            let _ = panic::catch_unwind(AssertUnwindSafe(move || hook(&before, &after)));
        }

        Ok(value)
    }
}

/// Run one check. Participants are restored before a rejection is returned
/// or a panic leaves the check.
fn judge<P: Participants>(
    name: &str,
    stage: CheckStage,
    check: &Check<'_, P>,
    participants: &mut P,
    saved: &P::Saved,
) -> Result<(), TransactionError> {
    let verdict = match panic::catch_unwind(AssertUnwindSafe(|| check(&*participants))) {
        Ok(verdict) => verdict,
        Err(payload) => {
            participants.restore(saved);
            log::debug!("tx '{}': rolled back ({:?} panicked)", name, stage);
            panic::resume_unwind(payload);
        }
    };

    match verdict.rejection(stage.default_reason()) {
        Some(reason) => {
            participants.restore(saved);
            log::debug!("tx '{}': rolled back ({})", name, reason);
            Err(TransactionError::aborted(name, stage, reason))
        }
        None => Ok(()),
    }
}
