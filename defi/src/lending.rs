//! Lending protocol that values A collateral in B through an oracle.

use flashlab_core::{attrs, Attributes, Stateful};
use serde::{Deserialize, Serialize};

use crate::error::{DefiError, DefiResult};
use crate::oracle::PriceOracle;
use crate::{relative_change, LTV_TOLERANCE};

/// Pauses borrowing when the oracle price moved too far from a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreaker {
    /// Largest tolerated relative move, as a fraction.
    pub threshold: f64,
    /// Reference price the move is measured against.
    pub last_price: f64,
}

impl CircuitBreaker {
    /// Arm with the oracle's current price as reference.
    pub fn arm(threshold: f64, oracle: &dyn PriceOracle) -> Self {
        Self {
            threshold,
            last_price: oracle.price_a_in_b(),
        }
    }

    /// Fail if `current` moved beyond the threshold.
    pub fn check(&self, current: f64) -> DefiResult<()> {
        let change = relative_change(self.last_price, current);
        if change > self.threshold {
            return Err(DefiError::circuit_breaker(change, self.threshold));
        }
        Ok(())
    }
}

/// Single-position lending market: A collateral, B debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingProtocol {
    /// Loan-to-value ratio.
    pub ltv: f64,
    pub collateral_a: f64,
    pub debt_b: f64,
    pub circuit: Option<CircuitBreaker>,
}

impl LendingProtocol {
    pub fn new(ltv: f64) -> Self {
        Self {
            ltv,
            collateral_a: 0.0,
            debt_b: 0.0,
            circuit: None,
        }
    }

    /// Protocol whose borrows trip when the price moves more than `threshold`.
    pub fn with_circuit_breaker(ltv: f64, threshold: f64, oracle: &dyn PriceOracle) -> Self {
        Self {
            circuit: Some(CircuitBreaker::arm(threshold, oracle)),
            ..Self::new(ltv)
        }
    }

    pub fn deposit_collateral_a(&mut self, amount: f64) {
        self.collateral_a += amount;
    }

    /// Collateral value in B at the oracle price.
    pub fn collateral_value_b(&self, oracle: &dyn PriceOracle) -> f64 {
        self.collateral_a * oracle.price_a_in_b()
    }

    /// B that can still be borrowed against the current collateral.
    pub fn max_borrowable_b(&self, oracle: &dyn PriceOracle) -> f64 {
        (self.collateral_value_b(oracle) * self.ltv - self.debt_b).max(0.0)
    }

    /// Borrow `amount` of B.
    pub fn borrow_b(&mut self, amount: f64, oracle: &dyn PriceOracle) -> DefiResult<()> {
        if let Some(circuit) = &self.circuit {
            circuit.check(oracle.price_a_in_b())?;
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(DefiError::non_positive("borrow_b", amount));
        }
        let max = self.max_borrowable_b(oracle);
        if amount > max + LTV_TOLERANCE {
            return Err(DefiError::exceeds_ltv(amount, max));
        }
        self.debt_b += amount;
        log::debug!("lending: borrowed {:.2} B, debt now {:.2}", amount, self.debt_b);
        Ok(())
    }

    /// Returns true if the debt exceeds what the collateral supports.
    pub fn is_liquidatable(&self, oracle: &dyn PriceOracle) -> bool {
        self.debt_b > self.collateral_value_b(oracle) * self.ltv + LTV_TOLERANCE
    }

    /// Move the circuit breaker reference to the current oracle price.
    pub fn update_last_price(&mut self, oracle: &dyn PriceOracle) {
        if let Some(circuit) = &mut self.circuit {
            circuit.last_price = oracle.price_a_in_b();
        }
    }
}

impl Stateful for LendingProtocol {
    type State = LendingProtocol;

    fn snapshot(&self) -> LendingProtocol {
        self.clone()
    }

    fn restore(&mut self, state: LendingProtocol) {
        *self = state;
    }

    fn attributes(&self) -> Attributes {
        attrs! {
            "ltv" => self.ltv,
            "collateral_a" => self.collateral_a,
            "debt_b" => self.debt_b,
            "circuit_threshold" => self.circuit.as_ref().map(|c| c.threshold),
            "last_price" => self.circuit.as_ref().map(|c| c.last_price),
        }
    }
}
