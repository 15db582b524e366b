//! Text reports for scenario runs.

use crate::orchestrator::{Outcome, ScenarioRun, StepRecord};
use crate::world::WorldState;

/// Defenses worth recommending after watching the attack.
pub const DEFENSE_NOTES: &str = "\
Observed defenses (recommended):
1) Robust oracles: multi-window TWAP or external feeds resistant to on-chain manipulation.
2) Borrow limits per block, or a cool-down between price moves and credit use.
3) Conservative LTV and larger haircuts for volatile collateral.
4) Size limits (per-transaction caps) and strict slippage checks.
5) Circuit breakers: pause lending when the price moves too far in a short span.
6) Several price sources aggregated by median.";

/// Render one world state under a heading.
pub fn render_world(title: &str, state: &WorldState) -> String {
    [
        format!("== {} ==", title),
        format!(
            "AMM reserves: A={:.2}, B={:.2} | spot B per A = {:.4}",
            state.amm.reserve_a, state.amm.reserve_b, state.spot_price
        ),
        format!("Flash pool B liquidity: {:.2}", state.pool.liquidity_b),
        format!(
            "Protocol: collateral A={:.2}, debt B={:.2}, liquidatable={}",
            state.protocol.collateral_a, state.protocol.debt_b, state.liquidatable
        ),
        format!("Attacker: A={:.2}, B={:.2}", state.attacker.a, state.attacker.b),
    ]
    .join("\n")
}

fn render_step(step: &StepRecord, quiet: bool) -> String {
    let mut text = render_world(&step.title, &step.world);
    if !quiet {
        if let Some(summary) = &step.summary {
            text.push_str("\n[summary] ");
            text.push_str(summary);
        }
    }
    text
}

/// Render every step of a run followed by its outcome.
///
/// `quiet` drops the commit summaries.
pub fn render_run(run: &ScenarioRun, quiet: bool) -> String {
    let mut sections: Vec<String> = run
        .steps
        .iter()
        .map(|step| render_step(step, quiet))
        .collect();
    sections.push(format!(">>> [{}] {}", run.name, run.outcome));
    sections.join("\n\n")
}

fn profit_column(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Profit { profit_b } => format!("{:.2}", profit_b),
        Outcome::Blocked { .. } => "-".to_string(),
        Outcome::Unprofitable { shortfall_b } => format!("{:.2}", -shortfall_b),
    }
}

fn outcome_column(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Profit { .. } => "profit".to_string(),
        Outcome::Blocked { step, .. } => format!("blocked at step {}", step.number()),
        Outcome::Unprofitable { .. } => "unprofitable".to_string(),
    }
}

/// One row per run: name, outcome and attacker profit in B.
pub fn render_comparison(runs: &[ScenarioRun]) -> String {
    let rows: Vec<[String; 3]> = runs
        .iter()
        .map(|run| {
            [
                run.name.clone(),
                outcome_column(&run.outcome),
                profit_column(&run.outcome),
            ]
        })
        .collect();

    let header = ["scenario", "outcome", "profit B"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: [&str; 3]| {
        format!(
            "{:<w0$}  {:<w1$}  {:>w2$}",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )
    };

    let mut out = vec![line(header)];
    out.push(widths.map(|w| "-".repeat(w)).join("  "));
    for row in &rows {
        out.push(line([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
    }
    out.join("\n")
}
