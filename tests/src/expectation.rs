//! Declarative expectations for scenario runs.

use flashlab_scenario::{AttackStep, Outcome, Preset, ScenarioRun, Simulation, SimulationConfig};

use crate::error::{CheckError, CheckResult};

type Custom = Box<dyn Fn(&ScenarioRun) -> Result<(), String>>;

/// What a scenario run must produce.
pub struct Expectation {
    preset: Preset,
    config: SimulationConfig,
    profit: Option<(f64, f64)>,
    blocked_at: Option<AttackStep>,
    reason: Option<String>,
    unprofitable: bool,
    steps: Option<usize>,
    custom: Vec<Custom>,
}

impl Expectation {
    /// Expect something of `preset` run with the default configuration.
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            config: SimulationConfig::default(),
            profit: None,
            blocked_at: None,
            reason: None,
            unprofitable: false,
            steps: None,
            custom: Vec::new(),
        }
    }

    /// Base configuration the preset's defenses are applied on.
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Attack succeeds with a profit in `[min, max]`.
    pub fn profit_between(mut self, min: f64, max: f64) -> Self {
        self.profit = Some((min, max));
        self
    }

    /// A defense stops the attack at `step`.
    pub fn blocked_at(mut self, step: AttackStep) -> Self {
        self.blocked_at = Some(step);
        self
    }

    /// The block reason contains `text`.
    pub fn reason_contains(mut self, text: impl Into<String>) -> Self {
        self.reason = Some(text.into());
        self
    }

    /// The attacker cannot repay the loan.
    pub fn unprofitable(mut self) -> Self {
        self.unprofitable = true;
        self
    }

    /// Exactly `count` step records, the initial state included.
    pub fn steps(mut self, count: usize) -> Self {
        self.steps = Some(count);
        self
    }

    /// Extra check on the finished run.
    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&ScenarioRun) -> Result<(), String> + 'static,
    {
        self.custom.push(Box::new(check));
        self
    }

    /// Run the scenario and verify every expectation.
    pub fn check(&self) -> CheckResult<ScenarioRun> {
        let run = Simulation::for_preset(&self.config, self.preset)?.run()?;
        let fail = |message: String| Err(CheckError::mismatch(&run.name, message));

        if let Some((min, max)) = self.profit {
            match run.outcome {
                Outcome::Profit { profit_b } if (min..=max).contains(&profit_b) => {}
                ref other => return fail(format!("expected profit in [{min}, {max}], got: {other}")),
            }
        }

        if let Some(expected) = self.blocked_at {
            match &run.outcome {
                Outcome::Blocked { step, .. } if *step == expected => {}
                other => return fail(format!("expected block at {expected}, got: {other}")),
            }
        }

        if let Some(text) = &self.reason {
            match &run.outcome {
                Outcome::Blocked { reason, .. } if reason.contains(text.as_str()) => {}
                other => {
                    return fail(format!("expected block reason containing '{text}', got: {other}"))
                }
            }
        }

        if self.unprofitable && !matches!(run.outcome, Outcome::Unprofitable { .. }) {
            return fail(format!("expected unprofitable attack, got: {}", run.outcome));
        }

        if let Some(count) = self.steps {
            if run.steps.len() != count {
                return fail(format!("expected {} steps, got {}", count, run.steps.len()));
            }
        }

        for check in &self.custom {
            if let Err(message) = check(&run) {
                return fail(message);
            }
        }

        Ok(run)
    }
}
