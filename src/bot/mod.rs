pub mod engine;
pub mod leaderboard;
pub mod parser;
pub mod resolver;

pub use engine::{reconcile, ResolutionOutcome};
