//! Final report of a simulation

use crate::core::Card;
use crate::game::{GameEndReason, GameResult, GameState};
use crate::zones::CardStack;
use crate::{RatscrewError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output
    Json,
}

/// How a run finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The game ended by its own rules
    Normal(GameEndReason),
    /// A stack error stopped the simulation early
    Abnormal(String),
}

/// Final stack contents plus how the game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    pub seed: Option<u64>,
    pub rounds_played: u32,
    pub termination: Termination,
    /// Cards bottom first
    pub table: Vec<Card>,
    pub player1: Vec<Card>,
    pub player2: Vec<Card>,
}

impl FinalReport {
    /// Report a game that ended normally
    pub fn new(game: &GameState, result: &GameResult) -> Self {
        Self::build(game, result.rounds_played, Termination::Normal(result.end_reason))
    }

    /// Report whatever is left after the engine failed
    pub fn abnormal(game: &GameState, error: &RatscrewError) -> Self {
        let rounds_played = game.round.saturating_sub(1);
        Self::build(game, rounds_played, Termination::Abnormal(error.to_string()))
    }

    /// Report the outcome of `GameLoop::run_game`, whichever way it went
    pub fn from_outcome(game: &GameState, outcome: &Result<GameResult>) -> Self {
        match outcome {
            Ok(result) => Self::new(game, result),
            Err(e) => Self::abnormal(game, e),
        }
    }

    fn build(game: &GameState, rounds_played: u32, termination: Termination) -> Self {
        FinalReport {
            seed: game.seed,
            rounds_played,
            termination,
            table: game.table.cards().to_vec(),
            player1: game.player1.cards().to_vec(),
            player2: game.player2.cards().to_vec(),
        }
    }

    pub fn is_abnormal(&self) -> bool {
        matches!(self.termination, Termination::Abnormal(_))
    }

    pub fn total_cards(&self) -> usize {
        self.table.len() + self.player1.len() + self.player2.len()
    }

    /// Render as text, listing card ids or (with `names`) "Face of Suit"
    pub fn render_text(&self, names: bool) -> String {
        let mut out = String::new();
        if let Termination::Abnormal(reason) = &self.termination {
            let _ = writeln!(out, "ABNORMAL TERMINATION: {}", reason);
        }
        if let Some(seed) = self.seed {
            let _ = writeln!(out, "SEED: {}", seed);
        }
        let _ = writeln!(out, "ROUNDS PLAYED: {}", self.rounds_played);
        match &self.termination {
            Termination::Normal(GameEndReason::RoundLimit) => {
                let _ = writeln!(out, "END: round limit");
            }
            Termination::Normal(GameEndReason::HandExhausted(seat)) => {
                let _ = writeln!(out, "END: {} out of cards, {} wins", seat, seat.other());
            }
            Termination::Abnormal(_) => {}
        }
        write_stack(&mut out, "CARDS ON TABLE:", &self.table, names);
        write_stack(&mut out, "PLAYER 1:", &self.player1, names);
        write_stack(&mut out, "PLAYER 2:", &self.player2, names);
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RatscrewError::Serialization(e.to_string()))
    }

    pub fn render(&self, format: OutputFormat, names: bool) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text(names)),
            OutputFormat::Json => self.to_json(),
        }
    }
}

fn write_stack(out: &mut String, title: &str, cards: &[Card], names: bool) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "Stack has {} card(s) in it.", cards.len());
    for card in cards {
        if names {
            let _ = writeln!(out, "{}", card);
        } else {
            let _ = writeln!(out, "{}", card.id());
        }
    }
}

/// Stack contents as ids, bottom first
pub fn stack_ids(stack: &CardStack) -> Vec<u8> {
    stack.cards().iter().map(|c| c.id()).collect()
}
