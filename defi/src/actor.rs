//! Market participant balances.

use flashlab_core::{attrs, Attributes, Stateful};
use serde::{Deserialize, Serialize};

/// Balances of one actor in asset A and asset B.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub a: f64,
    pub b: f64,
}

impl Actor {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Returns true if neither balance is negative.
    pub fn is_solvent(&self) -> bool {
        self.a >= 0.0 && self.b >= 0.0
    }
}

impl Stateful for Actor {
    type State = Actor;

    fn snapshot(&self) -> Actor {
        self.clone()
    }

    fn restore(&mut self, state: Actor) {
        *self = state;
    }

    fn attributes(&self) -> Attributes {
        attrs! { "a" => self.a, "b" => self.b }
    }
}
