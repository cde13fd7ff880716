//! Main game state structure

use crate::core::{Card, Seat, DECK_SIZE};
use crate::game::GameLogger;
use crate::history::{ActionLog, GameAction};
use crate::zones::{CardStack, Zone};
use crate::{RatscrewError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Where the current challenge stands
///
/// A single enum rather than two flags: a challenge cannot be in progress
/// and already won at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChallengeStatus {
    /// Normal play, nobody owes cards
    #[default]
    Idle,
    /// The current player owes response cards for the table's top card
    Active,
    /// The responder failed; the table goes to whoever is current next round
    Won,
}

/// Complete game state
///
/// Owns every stack and flag of one simulation. Nothing is global, so any
/// number of games can run side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Undealt cards (empty once the hands are dealt)
    pub deck: CardStack,

    /// Shared pile of played cards
    pub table: CardStack,

    pub player1: CardStack,

    pub player2: CardStack,

    /// Seat whose turn it is
    pub current: Seat,

    pub challenge: ChallengeStatus,

    /// Number of the round about to be played (starts at 1)
    pub round: u32,

    /// Seed used for the shuffle, if the deal was random
    pub seed: Option<u64>,

    /// Log of every play and challenge event
    pub history: ActionLog,

    /// Centralized logger for game events
    #[serde(skip)]
    pub logger: GameLogger,
}

impl GameState {
    /// Create a game with an empty deck and empty hands
    fn empty() -> Self {
        GameState {
            deck: CardStack::new(Zone::Deck),
            table: CardStack::new(Zone::Table),
            player1: CardStack::new(Zone::Hand(Seat::Player1)),
            player2: CardStack::new(Zone::Hand(Seat::Player2)),
            current: Seat::Player1,
            challenge: ChallengeStatus::Idle,
            round: 1,
            seed: None,
            history: ActionLog::new(),
            logger: GameLogger::new(),
        }
    }

    /// Create a game from a seeded shuffle of the 52 cards
    ///
    /// The same seed always produces the same deal.
    pub fn new_shuffled(seed: u64) -> Result<Self> {
        let mut game = Self::empty();
        for card in Card::all() {
            game.deck.push(card)?;
        }
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        game.deck.shuffle(&mut rng);
        game.seed = Some(seed);
        game.deal_hands()?;
        Ok(game)
    }

    /// Create a game from a fixed ordering of the 52 cards
    ///
    /// `deal[..26]` becomes player 1's hand and `deal[26..]` player 2's,
    /// bottom first, so `deal[25]` and `deal[51]` are played first.
    pub fn from_deal(deal: &[Card]) -> Result<Self> {
        validate_deal(deal)?;
        let mut game = Self::empty();
        for &card in deal {
            game.deck.push(card)?;
        }
        game.deal_hands()?;
        Ok(game)
    }

    /// Split the deck evenly, first half to player 1
    fn deal_hands(&mut self) -> Result<()> {
        let cards = self.deck.drain_all();
        let half = cards.len() / 2;
        for &card in &cards[..half] {
            self.player1.push(card)?;
        }
        for &card in &cards[half..] {
            self.player2.push(card)?;
        }
        Ok(())
    }

    pub fn hand(&self, seat: Seat) -> &CardStack {
        match seat {
            Seat::Player1 => &self.player1,
            Seat::Player2 => &self.player2,
        }
    }

    pub fn hand_mut(&mut self, seat: Seat) -> &mut CardStack {
        match seat {
            Seat::Player1 => &mut self.player1,
            Seat::Player2 => &mut self.player2,
        }
    }

    pub fn challenge_active(&self) -> bool {
        self.challenge == ChallengeStatus::Active
    }

    pub fn challenge_just_won(&self) -> bool {
        self.challenge == ChallengeStatus::Won
    }

    /// Move the top card of `seat`'s hand onto the table and return it
    pub fn play_card(&mut self, seat: Seat) -> Result<Card> {
        let card = self.hand_mut(seat).pop_top()?;
        self.table.push(card)?;
        self.history.log(GameAction::PlayCard { seat, card });
        Ok(card)
    }

    /// Put the whole table underneath `seat`'s hand, returning how many cards moved
    pub fn award_pile(&mut self, seat: Seat) -> Result<usize> {
        let count = self.table.len();
        let hand = match seat {
            Seat::Player1 => &mut self.player1,
            Seat::Player2 => &mut self.player2,
        };
        CardStack::transfer_all(&mut self.table, hand)?;
        self.history.log(GameAction::PileAwarded { seat, cards: count });
        Ok(count)
    }

    /// All four stacks, in reporting order
    pub fn stacks(&self) -> [&CardStack; 4] {
        [&self.deck, &self.table, &self.player1, &self.player2]
    }

    pub fn total_cards(&self) -> usize {
        self.stacks().iter().map(|s| s.len()).sum()
    }

    /// Check that the 52 cards are partitioned across the stacks exactly once
    pub fn check_conservation(&self) -> Result<()> {
        for stack in self.stacks() {
            if stack.len() > stack.capacity() {
                return Err(RatscrewError::ConservationViolated(format!(
                    "{} holds {} cards (capacity {})",
                    stack.zone_type,
                    stack.len(),
                    stack.capacity()
                )));
            }
        }

        let total = self.total_cards();
        if total != DECK_SIZE {
            return Err(RatscrewError::ConservationViolated(format!(
                "{} cards in play, expected {}",
                total, DECK_SIZE
            )));
        }

        let mut seen: FxHashSet<Card> = FxHashSet::default();
        for stack in self.stacks() {
            for &card in stack.cards() {
                if !seen.insert(card) {
                    return Err(RatscrewError::ConservationViolated(format!(
                        "card {} appears twice (again in {})",
                        card.id(),
                        stack.zone_type
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Check that `deal` is a permutation of the 52 card ids
pub fn validate_deal(deal: &[Card]) -> Result<()> {
    if deal.len() != DECK_SIZE {
        return Err(RatscrewError::InvalidDeal(format!(
            "expected {} cards, got {}",
            DECK_SIZE,
            deal.len()
        )));
    }
    let mut seen: FxHashSet<Card> = FxHashSet::default();
    for &card in deal {
        if !seen.insert(card) {
            return Err(RatscrewError::InvalidDeal(format!(
                "card {} appears more than once",
                card.id()
            )));
        }
    }
    Ok(())
}

/// Parse a deal written as card ids separated by commas or whitespace
pub fn parse_deal(input: &str) -> Result<Vec<Card>> {
    let cards = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let id = s
                .parse::<u32>()
                .map_err(|_| RatscrewError::InvalidDeal(format!("invalid card id: '{}'", s)))?;
            Card::new(id)
                .map_err(|_| RatscrewError::InvalidDeal(format!("card id {} out of range", id)))
        })
        .collect::<Result<Vec<_>>>()?;
    validate_deal(&cards)?;
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_deal() -> Vec<Card> {
        Card::all().collect()
    }

    #[test]
    fn test_shuffled_game_is_dealt_evenly() {
        let game = GameState::new_shuffled(42).unwrap();
        assert!(game.deck.is_empty());
        assert!(game.table.is_empty());
        assert_eq!(game.player1.len(), 26);
        assert_eq!(game.player2.len(), 26);
        assert_eq!(game.current, Seat::Player1);
        assert_eq!(game.round, 1);
        assert_eq!(game.challenge, ChallengeStatus::Idle);
        game.check_conservation().unwrap();
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = GameState::new_shuffled(7).unwrap();
        let b = GameState::new_shuffled(7).unwrap();
        let c = GameState::new_shuffled(8).unwrap();
        assert_eq!(a.player1, b.player1);
        assert_eq!(a.player2, b.player2);
        assert_ne!(a.player1.cards(), c.player1.cards());
    }

    #[test]
    fn test_fixed_deal_split() {
        let game = GameState::from_deal(&identity_deal()).unwrap();
        assert_eq!(game.player1.cards()[0].id(), 0);
        assert_eq!(game.player1.peek_top().unwrap().id(), 25);
        assert_eq!(game.player2.cards()[0].id(), 26);
        assert_eq!(game.player2.peek_top().unwrap().id(), 51);
    }

    #[test]
    fn test_invalid_deals_rejected() {
        let mut short = identity_deal();
        short.pop();
        assert!(matches!(
            GameState::from_deal(&short),
            Err(RatscrewError::InvalidDeal(_))
        ));

        let mut dup = identity_deal();
        dup[1] = dup[0];
        assert!(matches!(
            GameState::from_deal(&dup),
            Err(RatscrewError::InvalidDeal(_))
        ));
    }

    #[test]
    fn test_parse_deal() {
        let text: Vec<String> = (0..52).rev().map(|i| i.to_string()).collect();
        let deal = parse_deal(&text.join(",")).unwrap();
        assert_eq!(deal.len(), 52);
        assert_eq!(deal[0].id(), 51);

        let spaced = parse_deal(&text.join(" ")).unwrap();
        assert_eq!(deal, spaced);

        assert!(parse_deal("1,2,3").is_err());
        assert!(parse_deal("x").is_err());
        let mut bad = text.clone();
        bad[0] = "52".to_string();
        assert!(matches!(
            parse_deal(&bad.join(",")),
            Err(RatscrewError::InvalidDeal(msg)) if msg.contains("52")
        ));

        // Every malformed deal is reported the same way
        for input in ["1,2,3", "x", "0 1 -1"] {
            assert!(matches!(parse_deal(input), Err(RatscrewError::InvalidDeal(_))));
        }
    }

    #[test]
    fn test_play_card_moves_top_of_hand() {
        let mut game = GameState::from_deal(&identity_deal()).unwrap();
        let card = game.play_card(Seat::Player2).unwrap();
        assert_eq!(card.id(), 51);
        assert_eq!(game.table.peek_top().unwrap(), card);
        assert_eq!(game.player2.len(), 25);
        assert_eq!(
            game.history.peek(),
            Some(&GameAction::PlayCard { seat: Seat::Player2, card })
        );
        game.check_conservation().unwrap();
    }

    #[test]
    fn test_award_pile_goes_under_hand() {
        let mut game = GameState::from_deal(&identity_deal()).unwrap();
        game.play_card(Seat::Player1).unwrap(); // 25
        game.play_card(Seat::Player2).unwrap(); // 51

        let moved = game.award_pile(Seat::Player1).unwrap();
        assert_eq!(moved, 2);
        assert!(game.table.is_empty());
        assert_eq!(game.player1.cards()[0].id(), 25);
        assert_eq!(game.player1.cards()[1].id(), 51);
        assert_eq!(game.player1.peek_top().unwrap().id(), 24);
        game.check_conservation().unwrap();
    }

    #[test]
    fn test_conservation_detects_lost_card() {
        let mut game = GameState::from_deal(&identity_deal()).unwrap();
        game.player1.pop_top().unwrap();
        assert!(matches!(
            game.check_conservation(),
            Err(RatscrewError::ConservationViolated(_))
        ));
    }

    #[test]
    fn test_conservation_detects_duplicate() {
        let mut game = GameState::from_deal(&identity_deal()).unwrap();
        game.player1.pop_top().unwrap();
        let copied = game.player2.peek_top().unwrap();
        game.player1.push(copied).unwrap();
        assert_eq!(game.total_cards(), 52);
        assert!(game.check_conservation().is_err());
    }
}
