//! Card identifiers and their derived face/suit

use crate::{RatscrewError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cards in a standard deck
pub const DECK_SIZE: usize = 52;

/// Number of faces per suit
pub const FACES_PER_SUIT: u8 = 13;

/// Card suit, derived as `id / 13`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts = 0,
    Clubs = 1,
    Diamonds = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];

    pub fn name(&self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Spades => "Spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Card face (rank), derived as `id % 13`, ordered Two..Ace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Face {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Face {
    pub const ALL: [Face; 13] = [
        Face::Two,
        Face::Three,
        Face::Four,
        Face::Five,
        Face::Six,
        Face::Seven,
        Face::Eight,
        Face::Nine,
        Face::Ten,
        Face::Jack,
        Face::Queen,
        Face::King,
        Face::Ace,
    ];

    /// Number of response cards the opponent owes after this face is played
    ///
    /// Faces below Jack owe nothing and never start a challenge.
    pub fn challenge_value(&self) -> u8 {
        match self {
            Face::Jack => 1,
            Face::Queen => 2,
            Face::King => 3,
            Face::Ace => 4,
            _ => 0,
        }
    }

    /// Jack, Queen, King and Ace start (or counter) a challenge
    pub fn is_challenge(&self) -> bool {
        self.challenge_value() > 0
    }

    pub fn name(&self) -> &'static str {
        match self {
            Face::Two => "Two",
            Face::Three => "Three",
            Face::Four => "Four",
            Face::Five => "Five",
            Face::Six => "Six",
            Face::Seven => "Seven",
            Face::Eight => "Eight",
            Face::Nine => "Nine",
            Face::Ten => "Ten",
            Face::Jack => "Jack",
            Face::Queen => "Queen",
            Face::King => "King",
            Face::Ace => "Ace",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A card identifier in `0..52`
///
/// Face and suit are never stored; they are derived from the id on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    /// Create a card from a raw id, rejecting anything outside `0..52`
    pub fn new(id: u32) -> Result<Self> {
        if (id as usize) < DECK_SIZE {
            Ok(Card(id as u8))
        } else {
            Err(RatscrewError::InvalidCard(id))
        }
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn face(&self) -> Face {
        Face::ALL[(self.0 % FACES_PER_SUIT) as usize]
    }

    pub fn suit(&self) -> Suit {
        Suit::ALL[(self.0 / FACES_PER_SUIT) as usize]
    }

    /// All 52 cards in id order
    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE as u8).map(Card)
    }

    /// Render as "<Face> of <Suit>"
    pub fn name(&self) -> String {
        format!("{} of {}", self.face(), self.suit())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.face(), self.suit())
    }
}

impl TryFrom<u8> for Card {
    type Error = RatscrewError;

    fn try_from(id: u8) -> Result<Self> {
        Card::new(id as u32)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.0
    }
}
