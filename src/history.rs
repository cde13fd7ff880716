//! Action log for replay comparison and scenario testing
//!
//! Every card movement and challenge transition the engine performs is
//! appended here in order. Two runs from the same deal produce identical logs.

use crate::core::{Card, Seat};
use serde::{Deserialize, Serialize};

/// Atomic game events, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// A new round began with `seat` to act
    StartRound { round: u32, seat: Seat },

    /// Move the top card of a hand onto the table
    PlayCard { seat: Seat, card: Card },

    /// A face card was played in normal play; the opponent owes `owed` cards
    ChallengeStarted { challenger: Seat, card: Card, owed: u8 },

    /// The responder played a face card; the original challenger now owes `owed` cards
    ChallengeCountered { challenger: Seat, card: Card, owed: u8 },

    /// The responder played every owed card without producing a face card
    ChallengeLost { responder: Seat },

    /// The responder ran out of cards before paying the challenge
    ChallengeForfeited { responder: Seat, remaining: u8 },

    /// The whole table went under `seat`'s hand
    PileAwarded { seat: Seat, cards: usize },
}

/// Append-only log of game actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    /// Actions, most recent at end
    actions: Vec<GameAction>,

    /// Is logging enabled? (disabled for benchmarks)
    enabled: bool,

    /// Index into `actions` where each round starts
    round_starts: Vec<usize>,
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            actions: Vec::new(),
            enabled: true,
            round_starts: Vec::new(),
        }
    }

    /// Create a disabled log (for benchmarking)
    pub fn disabled() -> Self {
        ActionLog {
            actions: Vec::new(),
            enabled: false,
            round_starts: Vec::new(),
        }
    }

    /// Log an action
    pub fn log(&mut self, action: GameAction) {
        if !self.enabled {
            return;
        }
        if matches!(action, GameAction::StartRound { .. }) {
            self.round_starts.push(self.actions.len());
        }
        self.actions.push(action);
    }

    /// Get the most recent action without removing it
    pub fn peek(&self) -> Option<&GameAction> {
        self.actions.last()
    }

    /// Actions recorded during the given round (1-based)
    pub fn round_actions(&self, round: u32) -> &[GameAction] {
        let idx = match (round as usize).checked_sub(1) {
            Some(idx) => idx,
            None => return &[],
        };
        let Some(&start) = self.round_starts.get(idx) else {
            return &[];
        };
        let end = self
            .round_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.actions.len());
        &self.actions[start..end]
    }

    /// Cards played by a seat, in play order
    pub fn cards_played_by(&self, seat: Seat) -> Vec<Card> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                GameAction::PlayCard { seat: s, card } if *s == seat => Some(*card),
                _ => None,
            })
            .collect()
    }

    /// Count actions matching a predicate
    pub fn count(&self, pred: impl Fn(&GameAction) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }

    /// Get number of actions in log
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Clear the entire log
    pub fn clear(&mut self) {
        self.actions.clear();
        self.round_starts.clear();
    }

    /// Get all actions
    pub fn actions(&self) -> &[GameAction] {
        &self.actions
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}
