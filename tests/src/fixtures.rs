//! Plain participants for engine tests.

use flashlab_core::{attrs, Attributes, Stateful};

/// Two numeric fields, `x` and `y`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub x: f64,
    pub y: f64,
}

impl Record {
    pub fn with_x(x: f64) -> Self {
        Self { x, y: 0.0 }
    }

    pub fn with_y(y: f64) -> Self {
        Self { x: 0.0, y }
    }
}

impl Stateful for Record {
    type State = Record;

    fn snapshot(&self) -> Record {
        self.clone()
    }

    fn restore(&mut self, state: Record) {
        *self = state;
    }

    fn attributes(&self) -> Attributes {
        attrs! { "x" => self.x, "y" => self.y }
    }
}

/// Account with an integer balance, an entry log and a lock flag.
///
/// The log is part of the rolled-back state but not of the attribute view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub balance: i64,
    pub locked: bool,
    pub entries: Vec<i64>,
}

impl Ledger {
    pub fn new(balance: i64) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    pub fn post(&mut self, amount: i64) {
        self.balance += amount;
        self.entries.push(amount);
    }
}

impl Stateful for Ledger {
    type State = Ledger;

    fn snapshot(&self) -> Ledger {
        self.clone()
    }

    fn restore(&mut self, state: Ledger) {
        *self = state;
    }

    fn attributes(&self) -> Attributes {
        attrs! { "balance" => self.balance, "locked" => self.locked }
    }
}
