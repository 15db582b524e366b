//! Constant-product AMM (x·y = k) with a proportional fee on the input.

use flashlab_core::{attrs, Attributes, Stateful};
use serde::{Deserialize, Serialize};

use crate::error::{DefiError, DefiResult};

/// Two-asset pool trading A against B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amm {
    /// Reserve of asset A.
    pub reserve_a: f64,
    /// Reserve of asset B.
    pub reserve_b: f64,
    /// Fee taken from every input, as a fraction.
    pub fee: f64,
}

impl Amm {
    pub fn new(reserve_a: f64, reserve_b: f64, fee: f64) -> Self {
        Self {
            reserve_a,
            reserve_b,
            fee,
        }
    }

    /// Spot price of one A in B.
    pub fn price_a_in_b(&self) -> f64 {
        self.reserve_b / self.reserve_a
    }

    /// The invariant k = a·b.
    pub fn k(&self) -> f64 {
        self.reserve_a * self.reserve_b
    }

    /// Returns true if both reserves are positive.
    pub fn is_healthy(&self) -> bool {
        self.reserve_a > 0.0 && self.reserve_b > 0.0
    }

    /// Sell `dx` of A, returning the B received.
    ///
    /// - dx_net = dx · (1 - fee)
    /// - a1 = a0 + dx_net
    /// - b1 = k / a1
    /// - dy = b0 - b1
    pub fn swap_a_for_b(&mut self, dx: f64) -> DefiResult<f64> {
        if !dx.is_finite() || dx <= 0.0 {
            return Err(DefiError::non_positive("swap_a_for_b", dx));
        }
        let k = self.k();
        let new_a = self.reserve_a + dx * (1.0 - self.fee);
        let new_b = k / new_a;
        let dy = self.reserve_b - new_b;
        self.reserve_a = new_a;
        self.reserve_b = new_b;
        Ok(dy)
    }

    /// Sell `dy` of B, returning the A received.
    pub fn swap_b_for_a(&mut self, dy: f64) -> DefiResult<f64> {
        if !dy.is_finite() || dy <= 0.0 {
            return Err(DefiError::non_positive("swap_b_for_a", dy));
        }
        let k = self.k();
        let new_b = self.reserve_b + dy * (1.0 - self.fee);
        let new_a = k / new_b;
        let dx = self.reserve_a - new_a;
        self.reserve_a = new_a;
        self.reserve_b = new_b;
        Ok(dx)
    }
}

impl Stateful for Amm {
    type State = Amm;

    fn snapshot(&self) -> Amm {
        self.clone()
    }

    fn restore(&mut self, state: Amm) {
        *self = state;
    }

    fn attributes(&self) -> Attributes {
        attrs! { "a" => self.reserve_a, "b" => self.reserve_b, "fee" => self.fee }
    }
}
