//! flashlab DeFi collaborators
//!
//! The economic objects a flash-loan attack touches. Each one is a plain
//! mutable record implementing `Stateful`, so a transaction can roll it back.
//!
//! - `Amm`: constant-product pool with a proportional input fee
//! - `FlashLoanPool`: uncollateralized same-transaction loans
//! - `LendingProtocol`: collateralized borrowing priced by an oracle, with an
//!   optional circuit breaker
//! - `SpotOracle` / `TwapOracle`: price feeds for the lending protocol
//! - `Actor`: balances of a market participant

mod actor;
mod amm;
mod error;
mod lending;
mod oracle;
mod pool;

pub use actor::Actor;
pub use amm::Amm;
pub use error::{DefiError, DefiResult};
pub use lending::{CircuitBreaker, LendingProtocol};
pub use oracle::{PriceOracle, SpotOracle, TwapOracle, TwapReading};
pub use pool::FlashLoanPool;

/// Slack allowed when a flash pool lends out its whole balance.
pub const POOL_TOLERANCE: f64 = 1e-12;

/// Slack allowed when borrowing exactly the loan-to-value limit.
pub const LTV_TOLERANCE: f64 = 1e-9;

/// Floor for relative price-change denominators.
pub const MIN_PRICE: f64 = 1e-12;

/// Relative change from `old` to `new`.
pub fn relative_change(old: f64, new: f64) -> f64 {
    (new - old).abs() / old.max(MIN_PRICE)
}
