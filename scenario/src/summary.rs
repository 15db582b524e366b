//! Commit summaries.
//!
//! Every attack transaction runs over the same participant order, so the
//! handles below address the before/after snapshots handed to `on_commit`.

use flashlab_core::{CoreResult, ParticipantId};
use flashlab_transaction::Snapshot;

pub(crate) const ATTACKER: ParticipantId = ParticipantId(0);
pub(crate) const AMM: ParticipantId = ParticipantId(1);
pub(crate) const POOL: ParticipantId = ParticipantId(2);
pub(crate) const PROTOCOL: ParticipantId = ParticipantId(3);

struct Change {
    before: f64,
    after: f64,
}

impl Change {
    fn read(before: &Snapshot, after: &Snapshot, id: ParticipantId, attr: &str) -> CoreResult<Self> {
        Ok(Self {
            before: before.number(id, attr)?,
            after: after.number(id, attr)?,
        })
    }

    fn delta(&self) -> f64 {
        self.after - self.before
    }
}

fn spot(snapshot: &Snapshot) -> CoreResult<f64> {
    Ok(snapshot.number(AMM, "b")? / snapshot.number(AMM, "a")?)
}

pub(crate) fn manipulate(before: &Snapshot, after: &Snapshot) -> CoreResult<String> {
    let b = Change::read(before, after, ATTACKER, "b")?;
    let a = Change::read(before, after, ATTACKER, "a")?;
    let reserve_a = Change::read(before, after, AMM, "a")?;
    let reserve_b = Change::read(before, after, AMM, "b")?;
    Ok(format!(
        "spent {:.2} B for {:.2} A; AMM A {:.2} -> {:.2}, AMM B {:.2} -> {:.2}; spot {:.4} -> {:.4}",
        -b.delta(),
        a.delta(),
        reserve_a.before,
        reserve_a.after,
        reserve_b.before,
        reserve_b.after,
        spot(before)?,
        spot(after)?,
    ))
}

pub(crate) fn deposit_borrow(before: &Snapshot, after: &Snapshot) -> CoreResult<String> {
    let collateral = Change::read(before, after, PROTOCOL, "collateral_a")?;
    let debt = Change::read(before, after, PROTOCOL, "debt_b")?;
    Ok(format!(
        "deposited {:.2} A, borrowed {:.2} B; debt {:.2} -> {:.2}",
        collateral.delta(),
        debt.delta(),
        debt.before,
        debt.after,
    ))
}

pub(crate) fn sell_back(before: &Snapshot, after: &Snapshot) -> CoreResult<String> {
    let a = Change::read(before, after, ATTACKER, "a")?;
    let b = Change::read(before, after, ATTACKER, "b")?;
    Ok(format!(
        "sold {:.2} A for {:.2} B; spot {:.4} -> {:.4}",
        -a.delta(),
        b.delta(),
        spot(before)?,
        spot(after)?,
    ))
}

pub(crate) fn repay(before: &Snapshot, after: &Snapshot) -> CoreResult<String> {
    let liquidity = Change::read(before, after, POOL, "b")?;
    let b = Change::read(before, after, ATTACKER, "b")?;
    Ok(format!(
        "repaid {:.2} B; pool liquidity {:.2} -> {:.2}; attacker keeps {:.2} B",
        liquidity.delta(),
        liquidity.before,
        liquidity.after,
        b.after,
    ))
}
