//! The flash-loan price manipulation attack.

use std::fmt;

use flashlab_defi::relative_change;
use flashlab_transaction::{Transaction, Verdict};

use crate::config::{Preset, SimulationConfig};
use crate::error::{ScenarioError, ScenarioResult};
use crate::summary;
use crate::world::{Feed, World, WorldState};

/// The steps of the attack, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStep {
    FlashLoan,
    Manipulate,
    DepositBorrow,
    SellBack,
    Repay,
}

impl AttackStep {
    /// 1-based position in the attack.
    pub fn number(&self) -> usize {
        match self {
            AttackStep::FlashLoan => 1,
            AttackStep::Manipulate => 2,
            AttackStep::DepositBorrow => 3,
            AttackStep::SellBack => 4,
            AttackStep::Repay => 5,
        }
    }

    /// Name of the transaction running this step.
    pub fn tx_name(&self) -> &'static str {
        match self {
            AttackStep::FlashLoan => "flash-loan",
            AttackStep::Manipulate => "manipulate",
            AttackStep::DepositBorrow => "deposit-borrow",
            AttackStep::SellBack => "sell-back",
            AttackStep::Repay => "repay",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AttackStep::FlashLoan => "1) Take flash loan in B",
            AttackStep::Manipulate => "2) Swap B -> A (pump A's price)",
            AttackStep::DepositBorrow => "3) Deposit A, borrow max B",
            AttackStep::SellBack => "4) Sell A back for B",
            AttackStep::Repay => "5) Repay flash loan + fee",
        }
    }
}

impl fmt::Display for AttackStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.tx_name())
    }
}

/// Post-check reasons that guard the model itself, not a defense.
const INVALID_SWAP: &str = "invalid balances after swap";
const NEGATIVE_BALANCE: &str = "negative attacker balance";

/// Turn a rejected consistency check into a fault so it is never reported
/// as a blocked attack.
fn inconsistency(err: ScenarioError) -> ScenarioError {
    match err {
        ScenarioError::Transaction(e) if [INVALID_SWAP, NEGATIVE_BALANCE].contains(&e.reason()) => {
            ScenarioError::Inconsistent(e)
        }
        other => other,
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The loan was repaid; the attacker keeps `profit_b`.
    Profit { profit_b: f64 },
    /// A defense rejected a step. Its mutations were rolled back and the
    /// attack stopped there.
    Blocked { step: AttackStep, reason: String },
    /// The attacker could not repay the flash loan.
    Unprofitable { shortfall_b: f64 },
}

impl Outcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Outcome::Blocked { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Profit { profit_b } => {
                write!(f, "attack succeeded, attacker profit {:.2} B", profit_b)
            }
            Outcome::Blocked { step, reason } => {
                write!(f, "attack blocked at {}: {}", step, reason)
            }
            Outcome::Unprofitable { shortfall_b } => write!(
                f,
                "attack failed, attacker is {:.2} B short of repaying the loan",
                shortfall_b
            ),
        }
    }
}

/// The world after one step, with the commit summary of its transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub title: String,
    pub world: WorldState,
    pub summary: Option<String>,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRun {
    pub name: String,
    pub steps: Vec<StepRecord>,
    pub outcome: Outcome,
}

impl ScenarioRun {
    /// State after the last recorded step.
    pub fn final_state(&self) -> Option<&WorldState> {
        self.steps.last().map(|s| &s.world)
    }
}

/// Runs the attack against a fresh world.
pub struct Simulation {
    name: String,
    config: SimulationConfig,
    world: World,
    steps: Vec<StepRecord>,
}

impl Simulation {
    /// Create a simulation. Fails if the configuration is out of range.
    pub fn new(name: impl Into<String>, config: SimulationConfig) -> ScenarioResult<Self> {
        config.validate()?;
        let world = World::new(&config);
        Ok(Self {
            name: name.into(),
            config,
            world,
            steps: Vec::new(),
        })
    }

    /// Simulation named after `preset`, using its defenses on top of `base`.
    pub fn for_preset(base: &SimulationConfig, preset: Preset) -> ScenarioResult<Self> {
        Self::new(preset.name(), base.clone().with_preset(preset))
    }

    /// Get the simulation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run every step until the loan is repaid or a defense stops the attack.
    ///
    /// A defense stopping the attack is a normal outcome, not an error.
    /// Errors are reserved for collaborator failures no defense explains.
    pub fn run(mut self) -> ScenarioResult<ScenarioRun> {
        log::info!("scenario '{}': starting", self.name);
        self.record("Initial state", None);

        let received = self.world.pool.borrow(self.config.loan_b)?;
        self.world.attacker.b += received;
        self.world.sample_price();
        self.record(AttackStep::FlashLoan.title(), None);

        for step in [
            AttackStep::Manipulate,
            AttackStep::DepositBorrow,
            AttackStep::SellBack,
        ] {
            let result = match step {
                AttackStep::Manipulate => self.manipulate(),
                AttackStep::DepositBorrow => self.deposit_borrow(),
                _ => self.sell_back(),
            };
            match result {
                Ok(note) => {
                    self.world.sample_price();
                    self.record(step.title(), note);
                }
                Err(err) => match err.defense_reason() {
                    Some(reason) => {
                        log::warn!("scenario '{}': {} blocked: {}", self.name, step, reason);
                        return Ok(self.finish(Outcome::Blocked { step, reason }));
                    }
                    None => return Err(err),
                },
            }
        }

        let due = self.world.pool.repayment_due(self.config.loan_b);
        let outcome = match self.repay(due) {
            Ok(note) => {
                self.record(AttackStep::Repay.title(), note);
                Outcome::Profit {
                    profit_b: self.world.attacker.b,
                }
            }
            Err(ScenarioError::Transaction(e)) if e.is_pre_check_failure() => {
                log::warn!("scenario '{}': {}", self.name, e);
                Outcome::Unprofitable {
                    shortfall_b: due - self.world.attacker.b,
                }
            }
            Err(err) => return Err(err),
        };
        Ok(self.finish(outcome))
    }

    fn manipulate(&mut self) -> ScenarioResult<Option<String>> {
        let fraction = self.config.manipulation_fraction;
        let cap = self.config.defenses.per_tx_cap_b;
        let max_slippage = self.config.defenses.max_slippage;
        let b_before = self.world.attacker.b;
        let price_before = self.world.amm.price_a_in_b();
        let mut note = None;

        let World {
            attacker,
            amm,
            pool,
            protocol,
            ..
        } = &mut self.world;

        Transaction::new(
            AttackStep::Manipulate.tx_name(),
            (attacker, amm, pool, protocol),
        )
        .post_check(|(attacker, amm, _, _)| {
            let spent = b_before - attacker.b;
            Verdict::require(
                attacker.is_solvent() && amm.is_healthy(),
                INVALID_SWAP,
            )
            .and_then(|| match cap {
                Some(cap) if spent > cap => Verdict::reject(format!(
                    "spent {:.2} B, above the per-transaction cap of {:.2} B",
                    spent, cap
                )),
                _ => Verdict::Accept,
            })
            .and_then(|| match max_slippage {
                Some(max) => {
                    let moved = relative_change(price_before, amm.price_a_in_b());
                    Verdict::require(
                        moved <= max,
                        format!(
                            "slippage {:.2}% exceeds the {:.2}% limit",
                            moved * 100.0,
                            max * 100.0
                        ),
                    )
                }
                None => Verdict::Accept,
            })
        })
        .on_commit(|before, after| {
            note = Some(summary::manipulate(before, after)?);
            Ok(())
        })
        .run(|(attacker, amm, _, _)| {
            let spend = attacker.b * fraction;
            let received = amm.swap_b_for_a(spend)?;
            attacker.b -= spend;
            attacker.a += received;
            Ok::<_, ScenarioError>(())
        })
        .map_err(inconsistency)?;

        Ok(note)
    }

    fn deposit_borrow(&mut self) -> ScenarioResult<Option<String>> {
        let fraction = self.config.deposit_fraction;
        let mut note = None;

        let World {
            attacker,
            amm,
            pool,
            protocol,
            twap,
        } = &mut self.world;
        let twap = twap.as_ref();

        Transaction::new(
            AttackStep::DepositBorrow.tx_name(),
            (attacker, amm, pool, protocol),
        )
        .post_check(|(attacker, _, _, _)| {
            Verdict::require(attacker.is_solvent(), NEGATIVE_BALANCE)
        })
        .on_commit(|before, after| {
            note = Some(summary::deposit_borrow(before, after)?);
            Ok(())
        })
        .run(|(attacker, amm, _, protocol)| {
            let deposit = attacker.a * fraction;
            attacker.a -= deposit;
            protocol.deposit_collateral_a(deposit);

            let feed = Feed::new(twap, &**amm);
            let amount = protocol.max_borrowable_b(&feed);
            protocol.borrow_b(amount, &feed)?;
            attacker.b += amount;
            Ok::<_, ScenarioError>(())
        })
        .map_err(inconsistency)?;

        Ok(note)
    }

    fn sell_back(&mut self) -> ScenarioResult<Option<String>> {
        let fraction = self.config.sell_back_fraction;
        let mut note = None;

        let World {
            attacker,
            amm,
            pool,
            protocol,
            ..
        } = &mut self.world;

        Transaction::new(
            AttackStep::SellBack.tx_name(),
            (attacker, amm, pool, protocol),
        )
        .post_check(|(attacker, amm, _, _)| {
            Verdict::require(
                attacker.is_solvent() && amm.is_healthy(),
                INVALID_SWAP,
            )
        })
        .on_commit(|before, after| {
            note = Some(summary::sell_back(before, after)?);
            Ok(())
        })
        .run(|(attacker, amm, _, _)| {
            let sell = attacker.a * fraction;
            if sell > 0.0 {
                let received = amm.swap_a_for_b(sell)?;
                attacker.a -= sell;
                attacker.b += received;
            }
            Ok::<_, ScenarioError>(())
        })
        .map_err(inconsistency)?;

        Ok(note)
    }

    fn repay(&mut self, due: f64) -> ScenarioResult<Option<String>> {
        let mut note = None;

        let World {
            attacker,
            amm,
            pool,
            protocol,
            ..
        } = &mut self.world;

        Transaction::new(AttackStep::Repay.tx_name(), (attacker, amm, pool, protocol))
            .pre_check(move |(attacker, ..)| {
                Verdict::require(
                    attacker.b >= due,
                    format!("attacker holds {:.2} B but owes {:.2} B", attacker.b, due),
                )
            })
            .on_commit(|before, after| {
                note = Some(summary::repay(before, after)?);
                Ok(())
            })
            .run(|(attacker, _, pool, _)| {
                attacker.b -= due;
                pool.repay(due);
                Ok::<_, ScenarioError>(())
            })?;

        Ok(note)
    }

    fn record(&mut self, title: &str, summary: Option<String>) {
        log::info!("scenario '{}': {}", self.name, title);
        if let Some(text) = &summary {
            log::debug!("scenario '{}': {}", self.name, text);
        }
        self.steps.push(StepRecord {
            title: title.to_string(),
            world: self.world.state(),
            summary,
        });
    }

    fn finish(self, outcome: Outcome) -> ScenarioRun {
        log::info!("scenario '{}': {}", self.name, outcome);
        ScenarioRun {
            name: self.name,
            steps: self.steps,
            outcome,
        }
    }
}
