//! Flash-loan pool.

use flashlab_core::{attrs, Attributes, Stateful};
use serde::{Deserialize, Serialize};

use crate::error::{DefiError, DefiResult};
use crate::POOL_TOLERANCE;

/// Pool of B that lends without collateral within one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashLoanPool {
    /// Available liquidity in B.
    pub liquidity_b: f64,
    /// Fee charged on the principal, as a fraction.
    pub fee: f64,
}

impl FlashLoanPool {
    pub fn new(liquidity_b: f64, fee: f64) -> Self {
        Self { liquidity_b, fee }
    }

    /// Lend `amount` of B.
    pub fn borrow(&mut self, amount: f64) -> DefiResult<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DefiError::non_positive("flash borrow", amount));
        }
        if amount > self.liquidity_b + POOL_TOLERANCE {
            return Err(DefiError::insufficient_liquidity(amount, self.liquidity_b));
        }
        self.liquidity_b -= amount;
        Ok(amount)
    }

    /// Return `amount` of B to the pool.
    pub fn repay(&mut self, amount: f64) {
        self.liquidity_b += amount;
    }

    /// Principal plus fee owed for a loan of `loan`.
    pub fn repayment_due(&self, loan: f64) -> f64 {
        loan + loan * self.fee
    }
}

impl Stateful for FlashLoanPool {
    type State = FlashLoanPool;

    fn snapshot(&self) -> FlashLoanPool {
        self.clone()
    }

    fn restore(&mut self, state: FlashLoanPool) {
        *self = state;
    }

    fn attributes(&self) -> Attributes {
        attrs! { "b" => self.liquidity_b, "fee" => self.fee }
    }
}
