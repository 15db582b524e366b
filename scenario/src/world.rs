//! The objects an attack runs against.

use flashlab_defi::{
    Actor, Amm, FlashLoanPool, LendingProtocol, PriceOracle, SpotOracle, TwapOracle, TwapReading,
};
use serde::Serialize;

use crate::config::SimulationConfig;

/// Attacker, market and protocols of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub attacker: Actor,
    pub amm: Amm,
    pub pool: FlashLoanPool,
    pub protocol: LendingProtocol,
    /// Smoothed feed for the lending protocol, when the TWAP defense is on.
    pub twap: Option<TwapOracle>,
}

impl World {
    /// Build the initial world. A circuit breaker is armed at the opening
    /// spot price and the TWAP window holds the opening price as first sample.
    pub fn new(config: &SimulationConfig) -> Self {
        let amm = Amm::new(config.amm_reserve_a, config.amm_reserve_b, config.amm_fee);
        let pool = FlashLoanPool::new(config.flash_pool_liquidity_b, config.flash_pool_fee);
        let protocol = match config.defenses.circuit_threshold {
            Some(threshold) => LendingProtocol::with_circuit_breaker(
                config.lending_ltv,
                threshold,
                &SpotOracle::new(&amm),
            ),
            None => LendingProtocol::new(config.lending_ltv),
        };
        let twap = config.defenses.twap_window.map(|window| {
            let mut twap = TwapOracle::new(window);
            twap.sample(&amm);
            twap
        });

        Self {
            attacker: Actor::new(config.attacker_initial_a, 0.0),
            amm,
            pool,
            protocol,
            twap,
        }
    }

    /// Price the lending protocol sees right now.
    pub fn oracle_price(&self) -> f64 {
        Feed::new(self.twap.as_ref(), &self.amm).price_a_in_b()
    }

    /// Feed the current spot price to the TWAP window, if any.
    pub fn sample_price(&mut self) {
        if let Some(twap) = &mut self.twap {
            twap.sample(&self.amm);
        }
    }

    /// Read-only view for reporting.
    pub fn state(&self) -> WorldState {
        let feed = Feed::new(self.twap.as_ref(), &self.amm);
        WorldState {
            amm: self.amm.clone(),
            pool: self.pool.clone(),
            protocol: self.protocol.clone(),
            attacker: self.attacker.clone(),
            spot_price: self.amm.price_a_in_b(),
            oracle_price: feed.price_a_in_b(),
            liquidatable: self.protocol.is_liquidatable(&feed),
        }
    }
}

/// Copy of the world at one point of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldState {
    pub amm: Amm,
    pub pool: FlashLoanPool,
    pub protocol: LendingProtocol,
    pub attacker: Actor,
    pub spot_price: f64,
    pub oracle_price: f64,
    pub liquidatable: bool,
}

/// The price feed the lending protocol is wired to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Feed<'a> {
    Spot(SpotOracle<'a>),
    Twap(TwapReading<'a>),
}

impl<'a> Feed<'a> {
    pub(crate) fn new(twap: Option<&'a TwapOracle>, amm: &'a Amm) -> Self {
        match twap {
            Some(twap) => Feed::Twap(twap.reading(amm)),
            None => Feed::Spot(SpotOracle::new(amm)),
        }
    }
}

impl PriceOracle for Feed<'_> {
    fn price_a_in_b(&self) -> f64 {
        match self {
            Feed::Spot(oracle) => oracle.price_a_in_b(),
            Feed::Twap(oracle) => oracle.price_a_in_b(),
        }
    }
}
