//! Simulated sessions for the marr engine: a deterministic participant,
//! a session driver, and artefact writers shared with the CLI.

pub mod participant;
pub mod runner;

pub use participant::SimulatedParticipant;
pub use runner::{run_session, write_rdm_csv, SimOutcome, SimRunConfig, PER_ITEM_MILLIS};
