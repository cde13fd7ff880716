//! Game loop implementation
//!
//! Drives the round loop and the challenge state machine. One round is one
//! pass: award a pending pile, then either pay an open challenge (including
//! any counter-challenges it triggers) or make one normal play, then hand the
//! turn to the other seat.

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// When verbose-logging feature is disabled, this becomes a no-op at compile time,
/// eliminating the per-card format! allocations.
macro_rules! log_if_verbose {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self.game.logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self; // Suppress unused variable warning
        }
    };
}

use crate::core::{Card, Seat};
use crate::game::state::ChallengeStatus;
use crate::game::GameState;
use crate::history::GameAction;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Round cap used when none is configured
pub const DEFAULT_MAX_ROUNDS: u32 = 150;

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - rounds and challenge events (default)
    #[default]
    Normal = 2,
    /// Verbose - every card played and every pile award
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Winner of the game (None when the round cap ends it)
    pub winner: Option<Seat>,
    /// Total number of rounds completed
    pub rounds_played: u32,
    /// Reason the game ended
    pub end_reason: GameEndReason,
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEndReason {
    /// The configured round cap was reached
    RoundLimit,
    /// A seat had to make a normal play with an empty hand
    HandExhausted(Seat),
}

/// What happened when a responder tried to pay a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// The responder played a face card; the challenge restarts against the other seat
    Countered(Card),
    /// Every owed card was played without a face card
    Lost,
    /// The responder's hand ran out with `remaining` cards still owed
    Forfeited { remaining: u8 },
}

/// Result of a single round pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundOutcome {
    Continue,
    HandExhausted(Seat),
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    /// Rounds to play before stopping
    max_rounds: u32,
    /// Verbosity level for output (cached from game.logger)
    pub verbosity: VerbosityLevel,
    /// Verify card conservation after every round
    check_invariants: bool,
}

impl<'a> GameLoop<'a> {
    /// Create a new game loop for the given game state
    pub fn new(game: &'a mut GameState) -> Self {
        let verbosity = game.logger.verbosity();
        GameLoop {
            game,
            max_rounds: DEFAULT_MAX_ROUNDS,
            verbosity,
            check_invariants: cfg!(debug_assertions),
        }
    }

    /// Set the round cap
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set verbosity level on both the loop and the game's logger
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Enable or disable the per-round conservation check
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Run rounds until the round cap or a hand runs out
    pub fn run_game(&mut self) -> Result<GameResult> {
        loop {
            if let Some(result) = self.run_round_once()? {
                self.log_result(&result);
                return Ok(result);
            }
        }
    }

    /// Run at most `rounds` rounds, stopping early if the game ends
    pub fn run_rounds(&mut self, rounds: u32) -> Result<Option<GameResult>> {
        for _ in 0..rounds {
            if let Some(result) = self.run_round_once()? {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Run a single round and check for game-ending conditions
    ///
    /// Returns:
    /// - `Ok(Some(GameResult))` if the game is over
    /// - `Ok(None)` if another round should be played
    /// - `Err(_)` if a stack operation failed
    pub fn run_round_once(&mut self) -> Result<Option<GameResult>> {
        if self.game.round > self.max_rounds {
            return Ok(Some(GameResult {
                winner: None,
                rounds_played: self.rounds_played(),
                end_reason: GameEndReason::RoundLimit,
            }));
        }

        if let RoundOutcome::HandExhausted(seat) = self.run_round()? {
            return Ok(Some(GameResult {
                winner: Some(seat.other()),
                rounds_played: self.rounds_played(),
                end_reason: GameEndReason::HandExhausted(seat),
            }));
        }

        if self.check_invariants {
            self.game.check_conservation()?;
        }

        Ok(None)
    }

    fn rounds_played(&self) -> u32 {
        self.game.round.saturating_sub(1)
    }

    /// Play one round pass
    fn run_round(&mut self) -> Result<RoundOutcome> {
        let seat = self.game.current;
        let round = self.game.round;
        self.game.history.log(GameAction::StartRound { round, seat });
        self.game.logger.normal(&format!("ROUND {}:", round));

        if self.game.challenge == ChallengeStatus::Won {
            let count = self.game.award_pile(seat)?;
            self.game.challenge = ChallengeStatus::Idle;
            log_if_verbose!(self, "{} takes the pile ({} cards)", seat, count);
        }

        match self.game.challenge {
            ChallengeStatus::Active => self.resolve_challenge()?,
            _ => {
                if self.game.hand(seat).is_empty() {
                    self.game
                        .logger
                        .normal(&format!("{} has no cards left to play", seat));
                    return Ok(RoundOutcome::HandExhausted(seat));
                }
                let card = self.game.play_card(seat)?;
                log_if_verbose!(self, "{} plays {}", seat, card);
                if card.face().is_challenge() {
                    self.start_challenge(seat, card);
                }
            }
        }

        self.game.current = self.game.current.other();
        self.game.round += 1;
        Ok(RoundOutcome::Continue)
    }

    fn start_challenge(&mut self, challenger: Seat, card: Card) {
        let owed = card.face().challenge_value();
        self.game.challenge = ChallengeStatus::Active;
        self.game.history.log(GameAction::ChallengeStarted {
            challenger,
            card,
            owed,
        });
        self.game.logger.challenge(&format!(
            "{} plays {}: {} owes {}",
            challenger,
            card,
            challenger.other(),
            owed
        ));
    }

    /// Make the current seat pay the open challenge
    ///
    /// Each counter hands the challenge back to the other seat with a fresh
    /// budget from the countering card, inside the same round. Ends with the
    /// status set to `Won` and `current` on the seat that failed to pay.
    fn resolve_challenge(&mut self) -> Result<()> {
        loop {
            let responder = self.game.current;
            let owed = self.game.table.peek_top()?.face().challenge_value();

            match self.respond(responder, owed)? {
                ChallengeOutcome::Countered(card) => {
                    let owed = card.face().challenge_value();
                    self.game.current = responder.other();
                    self.game.history.log(GameAction::ChallengeCountered {
                        challenger: responder,
                        card,
                        owed,
                    });
                    self.game.logger.challenge(&format!(
                        "{} counters with {}: {} owes {}",
                        responder,
                        card,
                        responder.other(),
                        owed
                    ));
                }
                ChallengeOutcome::Lost => {
                    self.game.challenge = ChallengeStatus::Won;
                    self.game
                        .history
                        .log(GameAction::ChallengeLost { responder });
                    self.game.logger.challenge(&format!(
                        "{} fails the challenge; {} wins the pile",
                        responder,
                        responder.other()
                    ));
                    return Ok(());
                }
                ChallengeOutcome::Forfeited { remaining } => {
                    self.game.challenge = ChallengeStatus::Won;
                    self.game.history.log(GameAction::ChallengeForfeited {
                        responder,
                        remaining,
                    });
                    self.game.logger.challenge(&format!(
                        "{} runs out of cards owing {}; {} wins the pile",
                        responder,
                        remaining,
                        responder.other()
                    ));
                    return Ok(());
                }
            }
        }
    }

    /// Play up to `owed` cards from `responder`'s hand, stopping at the first face card
    fn respond(&mut self, responder: Seat, owed: u8) -> Result<ChallengeOutcome> {
        let mut remaining = owed;
        while remaining > 0 {
            if self.game.hand(responder).is_empty() {
                return Ok(ChallengeOutcome::Forfeited { remaining });
            }
            let card = self.game.play_card(responder)?;
            log_if_verbose!(self, "{} responds with {}", responder, card);
            if card.face().is_challenge() {
                return Ok(ChallengeOutcome::Countered(card));
            }
            remaining -= 1;
        }
        Ok(ChallengeOutcome::Lost)
    }

    fn log_result(&self, result: &GameResult) {
        let message = match result.end_reason {
            GameEndReason::RoundLimit => {
                format!("Round limit reached after {} rounds", result.rounds_played)
            }
            GameEndReason::HandExhausted(seat) => format!(
                "{} is out of cards after {} rounds; {} wins",
                seat,
                result.rounds_played,
                seat.other()
            ),
        };
        self.game.logger.minimal(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Face;

    /// Build a deal whose hands, read top first, are `p1_top` and `p2_top`
    ///
    /// Remaining cards fill the bottom of each hand in id order.
    fn deal_with_tops(p1_top: &[u8], p2_top: &[u8]) -> Vec<Card> {
        let used: Vec<u8> = p1_top.iter().chain(p2_top).copied().collect();
        let mut filler = (0u8..52).filter(|id| !used.contains(id));

        let mut hand = |top: &[u8]| -> Vec<Card> {
            let mut cards: Vec<u8> = (&mut filler).take(26 - top.len()).collect();
            cards.extend(top.iter().rev());
            cards.into_iter().map(|id| Card::new(id as u32).unwrap()).collect()
        };
        let mut deal = hand(p1_top);
        deal.extend(hand(p2_top));
        deal
    }

    fn quiet_game(deal: &[Card]) -> GameState {
        let mut game = GameState::from_deal(deal).unwrap();
        game.logger.enable_capture();
        game
    }

    #[test]
    fn test_game_loop_creation() {
        let mut game = GameState::new_shuffled(1).unwrap();
        let game_loop = GameLoop::new(&mut game);
        assert_eq!(game_loop.max_rounds(), DEFAULT_MAX_ROUNDS);
    }

    #[test]
    fn test_normal_play_alternates() {
        // Two (0) and Three (1) for P1, Four (2) and Five (3) for P2
        let deal = deal_with_tops(&[0, 1], &[2, 3]);
        let mut game = quiet_game(&deal);
        let mut game_loop = GameLoop::new(&mut game);

        assert_eq!(game_loop.run_rounds(3).unwrap(), None);

        assert_eq!(game.round, 4);
        assert_eq!(game.current, Seat::Player2);
        let table: Vec<u8> = game.table.cards().iter().map(|c| c.id()).collect();
        assert_eq!(table, vec![0, 2, 1]);
        assert_eq!(game.challenge, ChallengeStatus::Idle);
    }

    #[test]
    fn test_face_card_starts_challenge() {
        // P1 leads King of Hearts (11)
        let deal = deal_with_tops(&[11], &[0]);
        let mut game = quiet_game(&deal);
        let mut game_loop = GameLoop::new(&mut game);

        game_loop.run_rounds(1).unwrap();

        assert!(game.challenge_active());
        assert_eq!(game.current, Seat::Player2);
        assert_eq!(
            game.history.peek(),
            Some(&GameAction::ChallengeStarted {
                challenger: Seat::Player1,
                card: Card::new(11).unwrap(),
                owed: 3,
            })
        );
    }

    #[test]
    fn test_respond_counts_down_budget() {
        let deal = deal_with_tops(&[0], &[1, 2, 3]);
        let mut game = quiet_game(&deal);
        let mut game_loop = GameLoop::new(&mut game);

        let outcome = game_loop.respond(Seat::Player2, 2).unwrap();
        assert_eq!(outcome, ChallengeOutcome::Lost);
        assert_eq!(game.player2.len(), 24);
    }

    #[test]
    fn test_respond_stops_at_face_card() {
        // P2's second card is an Ace (12)
        let deal = deal_with_tops(&[0], &[1, 12, 2]);
        let mut game = quiet_game(&deal);
        let mut game_loop = GameLoop::new(&mut game);

        let outcome = game_loop.respond(Seat::Player2, 4).unwrap();
        assert_eq!(outcome, ChallengeOutcome::Countered(Card::new(12).unwrap()));
        assert_eq!(game.player2.len(), 24);
    }

    #[test]
    fn test_respond_with_empty_hand_forfeits() {
        let deal = deal_with_tops(&[0], &[1]);
        let mut game = quiet_game(&deal);
        while !game.player2.is_empty() {
            game.play_card(Seat::Player2).unwrap();
        }
        let mut game_loop = GameLoop::new(&mut game);

        let outcome = game_loop.respond(Seat::Player2, 3).unwrap();
        assert_eq!(outcome, ChallengeOutcome::Forfeited { remaining: 3 });
    }

    #[test]
    fn test_normal_play_with_empty_hand_ends_game() {
        let deal = deal_with_tops(&[0], &[1]);
        let mut game = quiet_game(&deal);
        while !game.player1.is_empty() {
            game.play_card(Seat::Player1).unwrap();
        }
        let mut game_loop = GameLoop::new(&mut game);

        let result = game_loop.run_round_once().unwrap().unwrap();
        assert_eq!(result.end_reason, GameEndReason::HandExhausted(Seat::Player1));
        assert_eq!(result.winner, Some(Seat::Player2));
        assert_eq!(result.rounds_played, 0);
    }

    #[test]
    fn test_round_cap_zero() {
        let mut game = GameState::new_shuffled(5).unwrap();
        game.logger.enable_capture();
        let result = GameLoop::new(&mut game)
            .with_max_rounds(0)
            .run_game()
            .unwrap();
        assert_eq!(result.end_reason, GameEndReason::RoundLimit);
        assert_eq!(result.rounds_played, 0);
        assert_eq!(game.table.len(), 0);
    }

    #[test]
    fn test_logs_round_headers() {
        let deal = deal_with_tops(&[0, 1], &[2, 3]);
        let mut game = quiet_game(&deal);
        GameLoop::new(&mut game).run_rounds(2).unwrap();

        let headers: Vec<String> = game
            .logger
            .logs()
            .iter()
            .filter(|e| e.message.starts_with("ROUND"))
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(headers, vec!["ROUND 1:", "ROUND 2:"]);
    }

    #[test]
    fn test_deal_helper_tops() {
        let deal = deal_with_tops(&[9, 10], &[11]);
        let game = GameState::from_deal(&deal).unwrap();
        assert_eq!(game.player1.peek_top().unwrap().face(), Face::Jack);
        assert_eq!(game.player2.peek_top().unwrap().face(), Face::King);
    }
}
