//! # blackjack-engine: Blackjack Rules Core
//!
//! The deterministic rules core for a single-player Blackjack table.
//! Scoring, outcome classification, the dealer's drawing policy and the
//! round-phase transition table all live here; nothing in this crate
//! performs I/O or owns randomness (the deck is shuffled and dealt by a
//! remote deck service).
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and wire-value parsing
//! - [`hand`] - Hand container and Blackjack scoring with soft-ace adjustment
//! - [`outcome`] - Round outcome classification (naturals, busts, wins, push)
//! - [`dealer`] - Dealer hit/stand policy (stand on 17)
//! - [`round`] - Round phases, actions and the phase transition table
//! - [`errors`] - Error types for card parsing and rejected transitions
//!
//! ## Quick Start
//!
//! ```rust
//! use blackjack_engine::cards::{Card, Rank, Suit};
//! use blackjack_engine::hand::Hand;
//! use blackjack_engine::outcome::{evaluate_round, RoundOutcome};
//!
//! let mut player = Hand::new();
//! player.push(Card { rank: Rank::Ace, suit: Suit::Spades });
//! player.push(Card { rank: Rank::King, suit: Suit::Hearts });
//!
//! let mut dealer = Hand::new();
//! dealer.push(Card { rank: Rank::Nine, suit: Suit::Clubs });
//! dealer.push(Card { rank: Rank::Eight, suit: Suit::Diamonds });
//!
//! assert_eq!(player.score(), 21);
//! assert_eq!(evaluate_round(&player, &dealer), RoundOutcome::PlayerBlackjack);
//! ```
//!
//! ## Transition Table
//!
//! Round actions are validated against an explicit table before any state
//! is touched:
//!
//! ```rust
//! use blackjack_engine::round::{RoundAction, RoundPhase};
//!
//! assert!(RoundPhase::AwaitingDeal.permits(RoundAction::Deal));
//! assert!(!RoundPhase::AwaitingDeal.permits(RoundAction::Stand));
//! ```

pub mod cards;
pub mod dealer;
pub mod errors;
pub mod hand;
pub mod outcome;
pub mod round;
