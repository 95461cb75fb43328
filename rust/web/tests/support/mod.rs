//! Scripted deck provider for tests: deterministic cards, no network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use blackjack_engine::cards::{Card, Rank, Suit};
use blackjack_web::{DeckInfo, DeckProvider, DrawnCard, ProviderError};

pub const SCRIPTED_DECK_ID: &str = "scripted-deck";

pub fn drawn(rank: Rank, suit: Suit) -> DrawnCard {
    let code = format!(
        "{}{}",
        match rank {
            Rank::Ten => "0".to_string(),
            Rank::Jack => "J".to_string(),
            Rank::Queen => "Q".to_string(),
            Rank::King => "K".to_string(),
            Rank::Ace => "A".to_string(),
            numeric => numeric.point_value().to_string(),
        },
        suit.as_str().chars().next().unwrap()
    );
    DrawnCard {
        card: Card { rank, suit },
        image: format!("https://cards.test/{code}.png"),
        code,
    }
}

/// Deals the scripted cards in order; draws fail on demand to simulate an
/// unreachable provider.
pub struct ScriptedDeck {
    cards: Mutex<VecDeque<DrawnCard>>,
    remaining: Mutex<u32>,
    failing: Mutex<bool>,
}

impl ScriptedDeck {
    pub fn new(ranks: &[Rank]) -> Self {
        let cards = ranks
            .iter()
            .map(|&rank| drawn(rank, Suit::Clubs))
            .collect();
        Self {
            cards: Mutex::new(cards),
            remaining: Mutex::new(52),
            failing: Mutex::new(false),
        }
    }

    pub fn queue(&self, ranks: &[Rank]) {
        let mut cards = self.cards.lock().unwrap();
        for &rank in ranks {
            cards.push_back(drawn(rank, Suit::Clubs));
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn check_available(&self) -> Result<(), ProviderError> {
        if *self.failing.lock().unwrap() {
            Err(ProviderError::InvalidDeck(
                "scripted provider failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DeckProvider for ScriptedDeck {
    async fn initialize_deck(&self) -> Result<DeckInfo, ProviderError> {
        self.check_available()?;
        Ok(DeckInfo {
            deck_id: SCRIPTED_DECK_ID.to_string(),
            remaining: *self.remaining.lock().unwrap(),
        })
    }

    async fn draw_cards(
        &self,
        deck_id: &str,
        count: u32,
    ) -> Result<Vec<DrawnCard>, ProviderError> {
        self.check_available()?;
        if deck_id != SCRIPTED_DECK_ID {
            return Err(ProviderError::InvalidDeck(format!(
                "unknown deck {deck_id}"
            )));
        }

        let mut cards = self.cards.lock().unwrap();
        if (cards.len() as u32) < count {
            return Err(ProviderError::InvalidDeck("scripted deck exhausted".into()));
        }
        let drawn: Vec<DrawnCard> = (0..count).filter_map(|_| cards.pop_front()).collect();
        *self.remaining.lock().unwrap() -= count;
        Ok(drawn)
    }

    async fn reshuffle(&self, deck_id: &str) -> Result<DeckInfo, ProviderError> {
        self.check_available()?;
        *self.remaining.lock().unwrap() = 52;
        Ok(DeckInfo {
            deck_id: deck_id.to_string(),
            remaining: 52,
        })
    }

    async fn deck_status(&self, deck_id: &str) -> Result<DeckInfo, ProviderError> {
        self.check_available()?;
        Ok(DeckInfo {
            deck_id: deck_id.to_string(),
            remaining: *self.remaining.lock().unwrap(),
        })
    }
}
