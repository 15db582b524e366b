//! Scenario preset integration tests.
//!
//! Each preset runs the full attack against the default market.

use flashlab_tests::prelude::*;

mod baseline {
    use super::*;

    pub fn scenario() -> Expectation {
        Expectation::preset(Preset::Baseline)
            .profit_between(3_970.0, 3_980.0)
            .steps(6)
            .custom(|run| {
                let manipulated = &run.steps[2].world;
                if manipulated.spot_price > 39.0 && manipulated.spot_price < 40.0 {
                    Ok(())
                } else {
                    Err(format!("unexpected pumped price {}", manipulated.spot_price))
                }
            })
    }

    #[test]
    fn test_unprotected_protocol_is_drained() {
        scenario().check().unwrap();
    }

    #[test]
    fn test_every_committed_step_has_a_summary() {
        let run = scenario().check().unwrap();

        let summarized: Vec<bool> = run.steps.iter().map(|s| s.summary.is_some()).collect();
        assert_eq!(summarized, vec![false, false, true, true, true, true]);
    }

    #[test]
    fn test_attacker_ends_with_debt_against_inflated_collateral() {
        let run = scenario().check().unwrap();
        let last = run.final_state().unwrap();

        assert!(last.protocol.debt_b > 10_000.0);
        assert!(last.liquidatable);
    }
}

mod slippage {
    use super::*;

    pub fn scenario() -> Expectation {
        Expectation::preset(Preset::Slippage)
            .blocked_at(AttackStep::Manipulate)
            .reason_contains("exceeds the 10.00% limit")
            .steps(2)
    }

    #[test]
    fn test_slippage_limit_reverts_manipulation() {
        scenario().check().unwrap();
    }

    #[test]
    fn test_loose_limit_lets_attack_through() {
        let config = SimulationConfig::default();
        let run = Expectation::preset(Preset::Slippage)
            .config(SimulationConfig {
                manipulation_fraction: 0.01,
                ..config
            })
            .check()
            .unwrap();

        assert!(!run.outcome.is_blocked());
    }
}

mod per_tx_cap {
    use super::*;

    pub fn scenario() -> Expectation {
        Expectation::preset(Preset::PerTxCap)
            .blocked_at(AttackStep::Manipulate)
            .reason_contains("per-transaction cap of 5000.00 B")
    }

    #[test]
    fn test_cap_blocks_large_swap() {
        let run = scenario().check().unwrap();
        let last = run.final_state().unwrap();

        assert_eq!(last.amm.reserve_a, 1_000.0);
        assert_eq!(last.amm.reserve_b, 10_000.0);
    }
}

mod circuit_breaker {
    use super::*;

    pub fn scenario() -> Expectation {
        Expectation::preset(Preset::CircuitBreaker)
            .blocked_at(AttackStep::DepositBorrow)
            .reason_contains("circuit breaker")
            .steps(3)
    }

    #[test]
    fn test_breaker_pauses_borrowing_after_pump() {
        let run = scenario().check().unwrap();
        let last = run.final_state().unwrap();

        assert_eq!(last.protocol.collateral_a, 0.0);
        assert_eq!(last.protocol.debt_b, 0.0);
    }
}

mod twap {
    use super::*;

    pub fn scenario() -> Expectation {
        Expectation::preset(Preset::Twap).unprofitable().steps(5)
    }

    #[test]
    fn test_smoothed_oracle_makes_attack_unprofitable() {
        let run = scenario().check().unwrap();

        match run.outcome {
            Outcome::Unprofitable { shortfall_b } => assert!(shortfall_b > 2_000.0),
            other => panic!("unexpected outcome: {other}"),
        }
    }

    #[test]
    fn test_failed_repayment_leaves_pool_short() {
        let run = scenario().check().unwrap();
        let last = run.final_state().unwrap();

        assert_eq!(last.pool.liquidity_b, 40_000.0);
    }
}

#[test]
fn test_mismatch_is_reported() {
    let err = Expectation::preset(Preset::Baseline)
        .blocked_at(AttackStep::Manipulate)
        .check()
        .unwrap_err();

    assert!(matches!(err, CheckError::Mismatch { .. }));
    assert!(err.to_string().starts_with("scenario 'baseline'"));
}
