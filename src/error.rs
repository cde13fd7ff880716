//! Error types for the ratscrew engine

use crate::zones::Zone;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatscrewError {
    #[error("Stack capacity exceeded: {zone} already holds {capacity} cards")]
    CapacityExceeded { zone: Zone, capacity: usize },

    #[error("Stack is empty: {0}")]
    EmptyStack(Zone),

    #[error("Invalid card id: {0} (expected 0..52)")]
    InvalidCard(u32),

    #[error("Invalid deal: {0}")]
    InvalidDeal(String),

    #[error("Card conservation violated: {0}")]
    ConservationViolated(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, RatscrewError>;
