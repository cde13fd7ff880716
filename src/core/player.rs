//! Player seats

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two seats at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    /// The opponent's seat
    pub fn other(&self) -> Seat {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }

    pub fn is_player1(&self) -> bool {
        matches!(self, Seat::Player1)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Player1 => write!(f, "Player 1"),
            Seat::Player2 => write!(f, "Player 2"),
        }
    }
}
