//! Core card and seat types

pub mod card;
pub mod player;

pub use card::{Card, Face, Suit, DECK_SIZE, FACES_PER_SUIT};
pub use player::Seat;
