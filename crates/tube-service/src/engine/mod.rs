//! Reaction engine - the only writer of reactions and target counters

mod reaction_engine;

pub use reaction_engine::{EngineResult, ReactionEngine, ReactionOutcome};
