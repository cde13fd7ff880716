//! Game state, round loop and reporting

pub mod game_loop;
pub mod logger;
pub mod report;
pub mod state;
pub mod state_hash;

pub use game_loop::{
    ChallengeOutcome, GameEndReason, GameLoop, GameResult, VerbosityLevel, DEFAULT_MAX_ROUNDS,
};
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use report::{FinalReport, OutputFormat, Termination};
pub use state::{ChallengeStatus, GameState};
pub use state_hash::compute_state_hash;
