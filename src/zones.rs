//! Card stacks (deck, table pile, player hands)

use crate::core::{Card, Seat, DECK_SIZE};
use crate::{RatscrewError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The places a card can be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Table,
    Hand(Seat),
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Deck => write!(f, "deck"),
            Zone::Table => write!(f, "table"),
            Zone::Hand(seat) => write!(f, "{seat} hand"),
        }
    }
}

/// An ordered, capacity-bounded stack of cards
///
/// Index 0 is the bottom; the last element is the top (last pushed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStack {
    /// Zone type
    pub zone_type: Zone,

    /// Maximum number of cards this stack may hold
    capacity: usize,

    /// Cards, bottom first
    cards: Vec<Card>,
}

impl CardStack {
    pub fn new(zone_type: Zone) -> Self {
        Self::with_capacity(zone_type, DECK_SIZE)
    }

    pub fn with_capacity(zone_type: Zone, capacity: usize) -> Self {
        CardStack {
            zone_type,
            capacity,
            cards: Vec::with_capacity(capacity),
        }
    }

    /// Append a card at the top
    pub fn push(&mut self, card: Card) -> Result<()> {
        if self.cards.len() >= self.capacity {
            return Err(RatscrewError::CapacityExceeded {
                zone: self.zone_type,
                capacity: self.capacity,
            });
        }
        self.cards.push(card);
        Ok(())
    }

    /// Remove and return the top card
    pub fn pop_top(&mut self) -> Result<Card> {
        self.cards
            .pop()
            .ok_or(RatscrewError::EmptyStack(self.zone_type))
    }

    /// Look at the top card without removing it
    pub fn peek_top(&self) -> Result<Card> {
        self.cards
            .last()
            .copied()
            .ok_or(RatscrewError::EmptyStack(self.zone_type))
    }

    /// Move every card of `from` underneath the cards already in `to`
    ///
    /// `from` keeps its internal order and ends up empty. Afterwards
    /// `to` reads `[from..., to...]` bottom to top, so awarded cards are
    /// played only after the player's existing cards.
    pub fn transfer_all(from: &mut CardStack, to: &mut CardStack) -> Result<()> {
        if from.is_empty() {
            return Ok(());
        }
        if from.len() + to.len() > to.capacity {
            return Err(RatscrewError::CapacityExceeded {
                zone: to.zone_type,
                capacity: to.capacity,
            });
        }
        let mut merged = std::mem::take(&mut from.cards);
        merged.extend_from_slice(&to.cards);
        to.cards = merged;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Cards from bottom to top
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Shuffle the stack in place
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    /// Remove every card, bottom first
    pub fn drain_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32) -> Card {
        Card::new(id).unwrap()
    }

    fn stack_of(zone: Zone, ids: &[u32]) -> CardStack {
        let mut stack = CardStack::new(zone);
        for &id in ids {
            stack.push(card(id)).unwrap();
        }
        stack
    }

    fn ids(stack: &CardStack) -> Vec<u8> {
        stack.cards().iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_push_pop_peek() {
        let mut stack = CardStack::new(Zone::Table);
        assert_eq!(stack.size(), 0);
        assert!(stack.is_empty());

        stack.push(card(10)).unwrap();
        stack.push(card(11)).unwrap();
        stack.push(card(12)).unwrap(); // Top

        assert_eq!(stack.size(), 3);
        assert_eq!(stack.peek_top().unwrap(), card(12));
        assert_eq!(stack.pop_top().unwrap(), card(12));
        assert_eq!(stack.pop_top().unwrap(), card(11));
        assert_eq!(stack.pop_top().unwrap(), card(10));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_empty_stack_errors() {
        let mut stack = CardStack::new(Zone::Hand(Seat::Player2));
        assert!(matches!(
            stack.pop_top(),
            Err(RatscrewError::EmptyStack(Zone::Hand(Seat::Player2)))
        ));
        assert!(matches!(stack.peek_top(), Err(RatscrewError::EmptyStack(_))));
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut stack = CardStack::with_capacity(Zone::Table, 2);
        stack.push(card(1)).unwrap();
        stack.push(card(2)).unwrap();
        let err = stack.push(card(3)).unwrap_err();
        assert!(matches!(
            err,
            RatscrewError::CapacityExceeded { zone: Zone::Table, capacity: 2 }
        ));
        assert_eq!(stack.size(), 2);
    }

    #[test]
    fn test_full_deck_fits() {
        let mut stack = CardStack::new(Zone::Deck);
        for c in Card::all() {
            stack.push(c).unwrap();
        }
        assert_eq!(stack.size(), DECK_SIZE);
        assert!(stack.push(card(0)).is_err());
    }

    #[test]
    fn test_transfer_all_inserts_at_bottom() {
        let mut from = stack_of(Zone::Table, &[1, 2, 3]);
        let mut to = stack_of(Zone::Hand(Seat::Player1), &[20, 21]);

        CardStack::transfer_all(&mut from, &mut to).unwrap();

        assert_eq!(ids(&to), vec![1, 2, 3, 20, 21]);
        assert!(from.is_empty());
        // The player's own cards are still played first
        assert_eq!(to.peek_top().unwrap(), card(21));
    }

    #[test]
    fn test_transfer_all_from_empty_is_noop() {
        let mut from = CardStack::new(Zone::Table);
        let mut to = stack_of(Zone::Hand(Seat::Player1), &[5, 6]);

        CardStack::transfer_all(&mut from, &mut to).unwrap();

        assert_eq!(ids(&to), vec![5, 6]);
        assert!(from.is_empty());
    }

    #[test]
    fn test_transfer_all_into_empty() {
        let mut from = stack_of(Zone::Table, &[7, 8]);
        let mut to = CardStack::new(Zone::Hand(Seat::Player2));

        CardStack::transfer_all(&mut from, &mut to).unwrap();

        assert_eq!(ids(&to), vec![7, 8]);
    }

    #[test]
    fn test_transfer_all_respects_capacity() {
        let mut from = stack_of(Zone::Table, &[1, 2]);
        let mut to = CardStack::with_capacity(Zone::Hand(Seat::Player1), 3);
        to.push(card(9)).unwrap();
        to.push(card(10)).unwrap();

        assert!(CardStack::transfer_all(&mut from, &mut to).is_err());
        // Nothing moved
        assert_eq!(ids(&from), vec![1, 2]);
        assert_eq!(ids(&to), vec![9, 10]);
    }
}
