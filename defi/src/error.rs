//! DeFi error types.

use thiserror::Error;

/// Rejected collaborator operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefiError {
    /// Swap or transfer amount was zero, negative or not finite.
    #[error("{operation}: amount must be positive and finite, got {amount}")]
    NonPositiveAmount { operation: &'static str, amount: f64 },

    /// Flash pool cannot cover the loan.
    #[error("not enough liquidity in flash pool: requested {requested:.2}, available {available:.2}")]
    InsufficientLiquidity { requested: f64, available: f64 },

    /// Borrow would exceed the loan-to-value limit.
    #[error("borrow of {requested:.2} would exceed LTV (max {max:.2})")]
    ExceedsLtv { requested: f64, max: f64 },

    /// Circuit breaker paused borrowing.
    #[error("circuit breaker: price moved {change:.2}% (limit {threshold:.2}%), borrowing paused")]
    CircuitBreakerTripped { change: f64, threshold: f64 },
}

impl DefiError {
    pub fn non_positive(operation: &'static str, amount: f64) -> Self {
        Self::NonPositiveAmount { operation, amount }
    }

    pub fn insufficient_liquidity(requested: f64, available: f64) -> Self {
        Self::InsufficientLiquidity { requested, available }
    }

    pub fn exceeds_ltv(requested: f64, max: f64) -> Self {
        Self::ExceedsLtv { requested, max }
    }

    /// Both values are fractions; the message shows percentages.
    pub fn circuit_breaker(change: f64, threshold: f64) -> Self {
        Self::CircuitBreakerTripped {
            change: change * 100.0,
            threshold: threshold * 100.0,
        }
    }
}

/// Result type for DeFi operations.
pub type DefiResult<T> = Result<T, DefiError>;
