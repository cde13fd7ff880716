//! Egyptian Ratscrew simulation engine
//!
//! A two-player "slap/challenge" card game played out for a fixed number of
//! rounds: cards go from the hands onto a shared pile, face cards demand a
//! number of response cards from the opponent, and a failed response hands
//! the whole pile to the challenger.

pub mod batch;
pub mod core;
pub mod error;
pub mod game;
pub mod history;
pub mod zones;

pub use error::{RatscrewError, Result};
