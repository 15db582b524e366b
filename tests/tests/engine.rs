//! Transaction engine integration tests.
//!
//! Atomicity, durability and commit-hook isolation over plain participants.

use flashlab_tests::prelude::*;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

const A: ParticipantId = ParticipantId(0);
const B: ParticipantId = ParticipantId(1);

#[derive(Debug, PartialEq)]
enum AppError {
    Boom,
    Aborted(TransactionError),
}

impl From<TransactionError> for AppError {
    fn from(e: TransactionError) -> Self {
        AppError::Aborted(e)
    }
}

mod reference_scenarios {
    use super::*;

    #[test]
    fn test_post_check_failure_restores_value() {
        // GIVEN
        let mut a = Record::with_x(10.0);

        // WHEN
        let result = Transaction::new("bump", (&mut a,))
            .post_check(|(a,)| a.x < 100.0)
            .run(|(a,)| {
                a.x = 999.0;
                Ok::<_, TransactionError>(())
            });

        // THEN
        let err = result.unwrap_err();
        assert_eq!(err.reason(), POST_CHECK_FAILED);
        assert_eq!(err.stage(), CheckStage::PostCheck);
        assert_eq!(a.x, 10.0);
    }

    #[test]
    fn test_body_error_restores_every_participant() {
        // GIVEN
        let mut a = Record::with_x(10.0);
        let mut b = Record::with_y(5.0);

        // WHEN
        let result: Result<(), AppError> =
            Transaction::new("partial", (&mut a, &mut b)).run(|(a, _b)| {
                a.x = 1.0;
                Err(AppError::Boom)
            });

        // THEN
        assert_eq!(result, Err(AppError::Boom));
        assert_eq!(a.x, 10.0);
        assert_eq!(b.y, 5.0);
    }

    #[test]
    fn test_commit_hands_before_and_after_to_hook() {
        // GIVEN
        let mut a = Record::with_x(10.0);
        let mut b = Record::with_y(5.0);
        let seen = RefCell::new(Vec::new());

        // WHEN
        Transaction::new("swap", (&mut a, &mut b))
            .on_commit(|before, after| {
                seen.borrow_mut().push((
                    before.number(A, "x")?,
                    before.number(B, "y")?,
                    after.number(A, "x")?,
                    after.number(B, "y")?,
                ));
                Ok(())
            })
            .run(|(a, b)| {
                a.x = 20.0;
                b.y = 3.0;
                Ok::<_, TransactionError>(())
            })
            .unwrap();

        // THEN
        assert_eq!(seen.into_inner(), vec![(10.0, 5.0, 20.0, 3.0)]);
        assert_eq!(a.x, 20.0);
        assert_eq!(b.y, 3.0);
    }
}

mod atomicity {
    use super::*;

    #[test]
    fn test_pre_check_rejection_skips_body() {
        let mut ledger = Ledger::new(100);
        ledger.locked = true;
        let ran = Cell::new(false);

        let result = Transaction::new("debit", (&mut ledger,))
            .pre_check(|(l,)| Verdict::require(!l.locked, "ledger locked"))
            .run(|(l,)| {
                ran.set(true);
                l.post(-50);
                Ok::<_, TransactionError>(())
            });

        let err = result.unwrap_err();
        assert!(err.is_pre_check_failure());
        assert_eq!(err.reason(), "ledger locked");
        assert!(!ran.get());
        assert_eq!(ledger.balance, 100);
    }

    #[test]
    fn test_rollback_restores_state_outside_attribute_view() {
        // GIVEN
        let mut ledger = Ledger::new(0);
        ledger.post(5);

        // WHEN
        let result = Transaction::new("overdraw", (&mut ledger,))
            .post_check(|(l,)| l.balance >= 0)
            .run(|(l,)| {
                l.post(3);
                l.post(-20);
                Ok::<_, TransactionError>(())
            });

        // THEN
        assert!(result.is_err());
        assert_eq!(ledger.entries, vec![5]);
        assert_eq!(ledger.balance, 5);
    }

    #[test]
    fn test_panic_in_body_restores_then_propagates() {
        let mut a = Record::with_x(1.0);
        let mut b = Record::with_y(2.0);

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            Transaction::new("panics", (&mut a, &mut b)).run(|(a, b)| {
                a.x = 50.0;
                b.y = 60.0;
                if a.x > b.y - 20.0 {
                    panic!("mid-body failure");
                }
                Ok::<_, TransactionError>(())
            })
        }));

        assert!(caught.is_err());
        assert_eq!(a, Record::with_x(1.0));
        assert_eq!(b, Record::with_y(2.0));
    }

    #[test]
    fn test_slice_participants_roll_back_together() {
        let mut ledgers = vec![Ledger::new(10), Ledger::new(20), Ledger::new(30)];

        let result = Transaction::new("sweep", ledgers.as_mut_slice())
            .post_check(|all| all.iter().all(|l| l.balance >= 0))
            .run(|all| {
                for l in all.iter_mut() {
                    l.post(-15);
                }
                Ok::<_, TransactionError>(())
            });

        assert!(result.is_err());
        let balances: Vec<i64> = ledgers.iter().map(|l| l.balance).collect();
        assert_eq!(balances, vec![10, 20, 30]);
        assert!(ledgers.iter().all(|l| l.entries.is_empty()));
    }

    #[test]
    fn test_rolled_back_run_leaves_untouched_participants_equal() {
        let mut a = Record::with_x(4.0);
        let mut b = Record::with_y(8.0);

        let result = Transaction::new("only-a", (&mut a, &mut b))
            .post_check(|_| Verdict::reject("never commits"))
            .run(|(a, _)| {
                a.x += 1.0;
                Ok::<_, TransactionError>(())
            });

        assert_eq!(result.unwrap_err().reason(), "never commits");
        assert_eq!(a, Record::with_x(4.0));
        assert_eq!(b, Record::with_y(8.0));
    }
}

mod durability {
    use super::*;

    #[test]
    fn test_committed_mutations_stay() {
        let mut ledger = Ledger::new(0);

        let posted = Transaction::new("credit", (&mut ledger,))
            .post_check(|(l,)| l.balance >= 0)
            .run(|(l,)| {
                l.post(12);
                Ok::<_, TransactionError>(l.entries.len())
            });

        assert_eq!(posted, Ok(1));
        assert_eq!(ledger.balance, 12);
        assert_eq!(ledger.entries, vec![12]);
    }

    #[test]
    fn test_back_to_back_transactions_take_fresh_snapshots() {
        // GIVEN
        let mut a = Record::with_x(1.0);
        let befores = RefCell::new(Vec::new());

        // WHEN
        for step in 1..=3 {
            Transaction::new(format!("step-{step}"), (&mut a,))
                .on_commit(|before, _| {
                    befores.borrow_mut().push(before.number(A, "x")?);
                    Ok(())
                })
                .run(|(a,)| {
                    a.x *= 2.0;
                    Ok::<_, TransactionError>(())
                })
                .unwrap();
        }

        // THEN
        assert_eq!(befores.into_inner(), vec![1.0, 2.0, 4.0]);
        assert_eq!(a.x, 8.0);
    }

    #[test]
    fn test_failed_transaction_does_not_affect_next_one() {
        let mut a = Record::with_x(1.0);

        let first = Transaction::new("rejected", (&mut a,))
            .post_check(|_| false)
            .run(|(a,)| {
                a.x = 100.0;
                Ok::<_, TransactionError>(())
            });
        let second = Transaction::new("accepted", (&mut a,)).run(|(a,)| {
            a.x += 1.0;
            Ok::<_, TransactionError>(a.x)
        });

        assert!(first.is_err());
        assert_eq!(second, Ok(2.0));
    }
}

mod commit_hook {
    use super::*;

    #[test]
    fn test_hook_error_is_swallowed() {
        let mut a = Record::with_x(1.0);

        let result = Transaction::new("hook-fails", (&mut a,))
            .on_commit(|_, _| Err(anyhow::anyhow!("report sink unavailable")))
            .run(|(a,)| {
                a.x = 2.0;
                Ok::<_, AppError>("committed")
            });

        assert_eq!(result, Ok("committed"));
        assert_eq!(a.x, 2.0);
    }

    #[test]
    fn test_hook_panic_is_swallowed() {
        let mut a = Record::with_x(1.0);

        let result = Transaction::new("hook-panics", (&mut a,))
            .on_commit(|_, after| {
                let x = after.number(A, "x")?;
                if x > 1.0 {
                    panic!("hook panicked after reading {x}");
                }
                Ok(())
            })
            .run(|(a,)| {
                a.x = 3.0;
                Ok::<_, TransactionError>(())
            });

        assert_eq!(result, Ok(()));
        assert_eq!(a.x, 3.0);
    }

    #[test]
    fn test_hook_sees_attribute_types() {
        let mut ledger = Ledger::new(7);
        let locked = RefCell::new(None);

        Transaction::new("lock", (&mut ledger,))
            .on_commit(|before, after| {
                let was = before.participant(A)?.get("locked").cloned();
                let now = after.participant(A)?.get("locked").cloned();
                *locked.borrow_mut() = Some((was, now));
                Ok(())
            })
            .run(|(l,)| {
                l.locked = true;
                Ok::<_, TransactionError>(())
            })
            .unwrap();

        assert_eq!(
            locked.into_inner(),
            Some((Some(Value::Bool(false)), Some(Value::Bool(true))))
        );
    }
}

mod nesting {
    use super::*;

    #[test]
    fn test_inner_abort_keeps_outer_changes() {
        let mut a = Record::with_x(1.0);
        let mut b = Record::with_y(1.0);

        let outer = Transaction::new("outer", (&mut a, &mut b)).run(|(a, b)| {
            a.x = 2.0;
            let inner = Transaction::new("inner", (&mut **b,))
                .post_check(|(b,)| b.y < 10.0)
                .run(|(b,)| {
                    b.y = 50.0;
                    Ok::<_, TransactionError>(())
                });
            Ok::<_, TransactionError>(inner.is_err())
        });

        assert_eq!(outer, Ok(true));
        assert_eq!(a.x, 2.0);
        assert_eq!(b.y, 1.0);
    }

    #[test]
    fn test_outer_abort_undoes_committed_inner() {
        let mut a = Record::with_x(1.0);
        let mut b = Record::with_y(1.0);

        let outer = Transaction::new("outer", (&mut a, &mut b))
            .post_check(|(a, _)| a.x < 0.0)
            .run(|(a, b)| {
                a.x = 2.0;
                Transaction::new("inner", (&mut **b,)).run(|(b,)| {
                    b.y = 9.0;
                    Ok::<_, TransactionError>(())
                })
            });

        assert!(outer.is_err());
        assert_eq!(a.x, 1.0);
        assert_eq!(b.y, 1.0);
    }
}
