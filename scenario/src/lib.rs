//! flashlab scenarios
//!
//! Runs the flash-loan price manipulation attack step by step, one
//! transaction per mutation step, with the defenses selected in a
//! `SimulationConfig`.
//!
//! - `config`: simulation parameters, defenses and presets
//! - `world`: the shared domain objects and their read-only state view
//! - `orchestrator`: the attack sequence and its outcome
//! - `summary`: per-step commit summaries built from before/after snapshots
//! - `report`: text rendering of states and runs

mod config;
mod error;
mod orchestrator;
pub mod report;
mod summary;
mod world;

pub use config::{Defenses, Preset, SimulationConfig};
pub use error::{ScenarioError, ScenarioResult};
pub use orchestrator::{AttackStep, Outcome, ScenarioRun, Simulation, StepRecord};
pub use world::{World, WorldState};
