//! Price feeds consulted by the lending protocol.

use std::collections::VecDeque;

use crate::amm::Amm;

/// Something that reports the price of one A in B.
pub trait PriceOracle {
    fn price_a_in_b(&self) -> f64;
}

/// Naive oracle: the AMM spot price, no smoothing.
#[derive(Debug, Clone, Copy)]
pub struct SpotOracle<'a> {
    amm: &'a Amm,
}

impl<'a> SpotOracle<'a> {
    pub fn new(amm: &'a Amm) -> Self {
        Self { amm }
    }
}

impl PriceOracle for SpotOracle<'_> {
    fn price_a_in_b(&self) -> f64 {
        self.amm.price_a_in_b()
    }
}

/// Moving average over the last `window` price samples.
///
/// The simulation has no clock, so the window is counted in samples (one
/// per step) rather than seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TwapOracle {
    window: usize,
    samples: VecDeque<f64>,
}

impl TwapOracle {
    /// A window of zero is treated as one sample.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
        }
    }

    /// Record the current spot price of `amm`.
    pub fn sample(&mut self, amm: &Amm) {
        self.push(amm.price_a_in_b());
    }

    /// Record a price, evicting the oldest sample beyond the window.
    pub fn push(&mut self, price: f64) {
        self.samples.push_back(price);
        while self.samples.len() > self.window {
            self.samples.pop_front();
        }
    }

    /// Mean of the recorded samples, if any.
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    /// Number of samples in the window.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no sample was recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Price feed that falls back to the live spot price of `amm` while the
    /// window is empty.
    pub fn reading<'a>(&'a self, amm: &'a Amm) -> TwapReading<'a> {
        TwapReading { twap: self, amm }
    }
}

/// A TWAP oracle read against a live AMM.
#[derive(Debug, Clone, Copy)]
pub struct TwapReading<'a> {
    twap: &'a TwapOracle,
    amm: &'a Amm,
}

impl PriceOracle for TwapReading<'_> {
    fn price_a_in_b(&self) -> f64 {
        self.twap
            .average()
            .unwrap_or_else(|| self.amm.price_a_in_b())
    }
}
