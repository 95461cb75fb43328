use serde::{Deserialize, Serialize};

use crate::errors::CardError;

/// Represents one of the four suits in a standard 52-card deck.
/// Used as a component of [`Card`] to fully define a playing card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    /// Parses the deck service's wire spelling of a suit ("CLUBS", "HEARTS", ...).
    ///
    /// Suits arrive from a trusted remote source, so a failure here is a
    /// data-integrity error rather than user input to be tolerated.
    pub fn from_api_value(value: &str) -> Result<Suit, CardError> {
        match value {
            "CLUBS" => Ok(Suit::Clubs),
            "DIAMONDS" => Ok(Suit::Diamonds),
            "HEARTS" => Ok(Suit::Hearts),
            "SPADES" => Ok(Suit::Spades),
            other => Err(CardError::InvalidSuit(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace (scores 11, soft-adjusted down to 1)
    Ace,
}

impl Rank {
    /// Parses the deck service's wire spelling of a rank ("2".."10",
    /// "JACK", "QUEEN", "KING", "ACE").
    ///
    /// Anything outside the thirteen recognized ranks is rejected with
    /// [`CardError::InvalidRank`] rather than defaulted; past this boundary
    /// the closed enum makes an invalid rank unrepresentable.
    pub fn from_api_value(value: &str) -> Result<Rank, CardError> {
        match value {
            "2" => Ok(Rank::Two),
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" => Ok(Rank::Ten),
            "JACK" => Ok(Rank::Jack),
            "QUEEN" => Ok(Rank::Queen),
            "KING" => Ok(Rank::King),
            "ACE" => Ok(Rank::Ace),
            other => Err(CardError::InvalidRank(other.to_string())),
        }
    }

    /// Blackjack point value of this rank: Ace counts 11 (the soft value;
    /// [`crate::hand::Hand::score`] adjusts it down), face cards count 10,
    /// numeric ranks at face value.
    pub fn point_value(&self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King | Rank::Ten => 10,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
        }
    }
}

/// A single playing card with a suit and rank. Cards are immutable value
/// objects produced only by the external deck service.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
}

impl Card {
    /// Builds a card from the wire spellings used by the deck service.
    pub fn from_api_values(value: &str, suit: &str) -> Result<Card, CardError> {
        Ok(Card {
            rank: Rank::from_api_value(value)?,
            suit: Suit::from_api_value(suit)?,
        })
    }

    /// Readable "Value Suit" label, e.g. `Ace Spades`.
    pub fn label(&self) -> String {
        format!("{} {}", self.rank.as_str(), self.suit.as_str())
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}
