//! Simulation configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScenarioError, ScenarioResult};

/// Market sizes, fees and attacker behaviour for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial AMM reserve of A
    pub amm_reserve_a: f64,

    /// Initial AMM reserve of B
    pub amm_reserve_b: f64,

    /// AMM fee on swap input (0.003 = 0.3%)
    pub amm_fee: f64,

    /// Flash pool liquidity in B
    pub flash_pool_liquidity_b: f64,

    /// Flash loan fee on principal (0.0009 = 0.09%)
    pub flash_pool_fee: f64,

    /// Lending protocol loan-to-value ratio
    pub lending_ltv: f64,

    /// A held by the attacker before the attack
    pub attacker_initial_a: f64,

    /// Flash loan size in B
    pub loan_b: f64,

    /// Share of the attacker's B swapped into A to move the price
    pub manipulation_fraction: f64,

    /// Share of the attacker's A deposited as collateral
    pub deposit_fraction: f64,

    /// Share of the remaining A sold back for B
    pub sell_back_fraction: f64,

    /// Defenses enabled for this run
    pub defenses: Defenses,
}

/// Optional protections. `None` disables a defense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defenses {
    /// Largest B amount a single manipulation transaction may spend
    pub per_tx_cap_b: Option<f64>,

    /// Largest relative spot price move a manipulation may cause
    pub max_slippage: Option<f64>,

    /// Relative oracle move that pauses lending
    pub circuit_threshold: Option<f64>,

    /// TWAP window in samples; the lending oracle reads spot price when unset
    pub twap_window: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            amm_reserve_a: 1_000.0,
            amm_reserve_b: 10_000.0,
            amm_fee: 0.003,
            flash_pool_liquidity_b: 50_000.0,
            flash_pool_fee: 0.0009,
            lending_ltv: 0.7,
            attacker_initial_a: 0.0,
            loan_b: 10_000.0,
            manipulation_fraction: 0.99,
            deposit_fraction: 0.95,
            sell_back_fraction: 0.90,
            defenses: Defenses::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ScenarioError::config_read(path, e))?;
        Self::from_toml(&text).map_err(|e| match e {
            ScenarioError::ConfigParse { source, .. } => ScenarioError::config_parse(path, source),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> ScenarioResult<Self> {
        let config: SimulationConfig =
            toml::from_str(text).map_err(|e| ScenarioError::config_parse("<inline>", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> ScenarioResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replace the defenses with those of `preset`.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.defenses = preset.defenses();
        self
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ScenarioResult<()> {
        positive("amm_reserve_a", self.amm_reserve_a)?;
        positive("amm_reserve_b", self.amm_reserve_b)?;
        positive("flash_pool_liquidity_b", self.flash_pool_liquidity_b)?;
        positive("loan_b", self.loan_b)?;
        rate("amm_fee", self.amm_fee)?;
        rate("flash_pool_fee", self.flash_pool_fee)?;
        fraction("lending_ltv", self.lending_ltv)?;
        fraction("manipulation_fraction", self.manipulation_fraction)?;
        fraction("deposit_fraction", self.deposit_fraction)?;
        fraction("sell_back_fraction", self.sell_back_fraction)?;
        if self.attacker_initial_a < 0.0 || self.attacker_initial_a.is_nan() {
            return Err(ScenarioError::invalid_config(
                "attacker_initial_a",
                format!("must not be negative, got {}", self.attacker_initial_a),
            ));
        }

        let d = &self.defenses;
        if let Some(cap) = d.per_tx_cap_b {
            positive("defenses.per_tx_cap_b", cap)?;
        }
        if let Some(slippage) = d.max_slippage {
            positive("defenses.max_slippage", slippage)?;
        }
        if let Some(threshold) = d.circuit_threshold {
            positive("defenses.circuit_threshold", threshold)?;
        }
        if d.twap_window == Some(0) {
            return Err(ScenarioError::invalid_config(
                "defenses.twap_window",
                "must be at least one sample",
            ));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> ScenarioResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ScenarioError::invalid_config(
            field,
            format!("must be positive, got {}", value),
        ))
    }
}

fn rate(field: &'static str, value: f64) -> ScenarioResult<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScenarioError::invalid_config(
            field,
            format!("must be in [0, 1), got {}", value),
        ))
    }
}

fn fraction(field: &'static str, value: f64) -> ScenarioResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ScenarioError::invalid_config(
            field,
            format!("must be in (0, 1], got {}", value),
        ))
    }
}

/// Named defense setups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Baseline,
    Slippage,
    PerTxCap,
    CircuitBreaker,
    Twap,
}

impl Preset {
    /// Every preset, in report order.
    pub const ALL: [Preset; 5] = [
        Preset::Baseline,
        Preset::Slippage,
        Preset::PerTxCap,
        Preset::CircuitBreaker,
        Preset::Twap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Baseline => "baseline",
            Preset::Slippage => "slippage",
            Preset::PerTxCap => "per-tx-cap",
            Preset::CircuitBreaker => "circuit-breaker",
            Preset::Twap => "twap",
        }
    }

    /// Defenses enabled by this preset.
    pub fn defenses(&self) -> Defenses {
        match self {
            Preset::Baseline => Defenses::default(),
            Preset::Slippage => Defenses {
                max_slippage: Some(0.10),
                ..Defenses::default()
            },
            Preset::PerTxCap => Defenses {
                per_tx_cap_b: Some(5_000.0),
                ..Defenses::default()
            },
            Preset::CircuitBreaker => Defenses {
                circuit_threshold: Some(0.20),
                ..Defenses::default()
            },
            Preset::Twap => Defenses {
                twap_window: Some(4),
                ..Defenses::default()
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s) || p.name().replace('-', "_") == s)
            .ok_or_else(|| ScenarioError::UnknownPreset(s.to_string()))
    }
}
