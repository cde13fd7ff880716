//! Batch mode for running many seeded games in parallel and collecting statistics
//!
//! Games run on the rayon thread pool. Each game's seed is derived from the
//! base seed and the game index, so a batch is reproducible as a whole.

use crate::core::Seat;
use crate::game::{GameEndReason, GameLoop, GameState, VerbosityLevel, DEFAULT_MAX_ROUNDS};
use crate::history::GameAction;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Batch parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub games: usize,
    pub seed: u64,
    pub max_rounds: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            games: 1000,
            seed: 42,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Seed for game `game_idx` of a batch
pub fn game_seed(base_seed: u64, game_idx: usize) -> u64 {
    base_seed.wrapping_add((game_idx as u64).wrapping_mul(0x9E3779B97F4A7C15))
}

/// Statistics collected during a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub games: usize,
    /// Games stopped by the round cap
    pub round_limit: usize,
    /// Games won because the opponent ran out of cards
    pub p1_wins: usize,
    pub p2_wins: usize,
    /// Games stopped by an engine error
    pub aborted: usize,
    pub total_rounds: u64,
    pub total_challenges: u64,
    pub total_counters: u64,
    pub total_awards: u64,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BatchStats {
    fn merge(mut self, other: BatchStats) -> BatchStats {
        self.games += other.games;
        self.round_limit += other.round_limit;
        self.p1_wins += other.p1_wins;
        self.p2_wins += other.p2_wins;
        self.aborted += other.aborted;
        self.total_rounds += other.total_rounds;
        self.total_challenges += other.total_challenges;
        self.total_counters += other.total_counters;
        self.total_awards += other.total_awards;
        self
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            total as f64 / self.games as f64
        }
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Batch Results ===")?;
        writeln!(f, "Games:            {}", self.games)?;
        writeln!(f, "Round limit:      {}", self.round_limit)?;
        writeln!(f, "Player 1 wins:    {}", self.p1_wins)?;
        writeln!(f, "Player 2 wins:    {}", self.p2_wins)?;
        writeln!(f, "Aborted:          {}", self.aborted)?;
        writeln!(f, "Avg rounds:       {:.2}", self.per_game(self.total_rounds))?;
        writeln!(f, "Avg challenges:   {:.2}", self.per_game(self.total_challenges))?;
        writeln!(f, "Avg counters:     {:.2}", self.per_game(self.total_counters))?;
        writeln!(f, "Avg pile awards:  {:.2}", self.per_game(self.total_awards))?;
        write!(f, "Elapsed:          {:.2}ms", self.elapsed.as_secs_f64() * 1000.0)
    }
}

/// Play one silent game and summarize it
fn play_one(seed: u64, max_rounds: u32) -> BatchStats {
    let mut stats = BatchStats {
        games: 1,
        ..BatchStats::default()
    };

    let mut game = match GameState::new_shuffled(seed) {
        Ok(game) => game,
        Err(_) => {
            stats.aborted = 1;
            return stats;
        }
    };

    let result = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_max_rounds(max_rounds)
        .run_game();

    match result {
        Ok(result) => {
            stats.total_rounds = result.rounds_played as u64;
            match result.end_reason {
                GameEndReason::RoundLimit => stats.round_limit = 1,
                GameEndReason::HandExhausted(Seat::Player1) => stats.p2_wins = 1,
                GameEndReason::HandExhausted(Seat::Player2) => stats.p1_wins = 1,
            }
        }
        Err(_) => stats.aborted = 1,
    }

    let history = &game.history;
    stats.total_challenges =
        history.count(|a| matches!(a, GameAction::ChallengeStarted { .. })) as u64;
    stats.total_counters =
        history.count(|a| matches!(a, GameAction::ChallengeCountered { .. })) as u64;
    stats.total_awards = history.count(|a| matches!(a, GameAction::PileAwarded { .. })) as u64;
    stats
}

/// Run a batch of games in parallel
pub fn run_batch(config: &BatchConfig) -> BatchStats {
    let start = Instant::now();
    let mut stats = (0..config.games)
        .into_par_iter()
        .map(|game_idx| play_one(game_seed(config.seed, game_idx), config.max_rounds))
        .reduce(BatchStats::default, BatchStats::merge);
    stats.elapsed = start.elapsed();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_seed_derivation() {
        assert_eq!(game_seed(42, 0), 42);
        assert_ne!(game_seed(42, 1), game_seed(42, 2));
        assert_eq!(game_seed(7, 3), game_seed(7, 3));
    }

    #[test]
    fn test_batch_counts_every_game() {
        let config = BatchConfig {
            games: 20,
            seed: 1,
            max_rounds: 150,
        };
        let stats = run_batch(&config);
        assert_eq!(stats.games, 20);
        assert_eq!(
            stats.round_limit + stats.p1_wins + stats.p2_wins + stats.aborted,
            20
        );
        assert_eq!(stats.aborted, 0);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let config = BatchConfig {
            games: 16,
            seed: 99,
            max_rounds: 60,
        };
        let mut a = run_batch(&config);
        let mut b = run_batch(&config);
        a.elapsed = Duration::ZERO;
        b.elapsed = Duration::ZERO;
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_batch() {
        let config = BatchConfig {
            games: 0,
            ..BatchConfig::default()
        };
        let stats = run_batch(&config);
        assert_eq!(stats.games, 0);
        assert_eq!(stats.per_game(10), 0.0);
    }
}
