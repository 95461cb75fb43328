//! Deck Provider: the external service that owns shuffling and dealing.
//!
//! The game core only ever sees the four operations of [`DeckProvider`];
//! [`DeckApiClient`] is the production implementation speaking the
//! deckofcardsapi.com wire format over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use blackjack_engine::cards::Card;
use blackjack_engine::errors::CardError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-call deadline for the remote deck service. A stalled call is
/// reported as [`ProviderError::Unavailable`] and can be retried by
/// re-issuing the triggering action.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("deck provider unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("invalid deck: {0}")]
    InvalidDeck(String),
    #[error("corrupt card data from provider: {0}")]
    BadCard(#[from] CardError),
}

/// Deck identity and remaining-card metadata returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckInfo {
    pub deck_id: String,
    pub remaining: u32,
}

/// A card as drawn from the provider: the parsed rank/suit plus the
/// provider's display metadata (compact code and face image URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub card: Card,
    pub code: String,
    pub image: String,
}

/// The four operations the game core depends on. Implemented over HTTP by
/// [`DeckApiClient`] and by scripted in-memory decks in tests.
#[async_trait]
pub trait DeckProvider: Send + Sync {
    /// Creates and shuffles a fresh deck.
    async fn initialize_deck(&self) -> Result<DeckInfo, ProviderError>;

    /// Draws `count` cards in order. A short draw means the deck is
    /// exhausted and is reported as [`ProviderError::InvalidDeck`].
    async fn draw_cards(&self, deck_id: &str, count: u32)
        -> Result<Vec<DrawnCard>, ProviderError>;

    /// Returns all drawn cards to the deck and reshuffles.
    async fn reshuffle(&self, deck_id: &str) -> Result<DeckInfo, ProviderError>;

    /// Remaining-card count, used for display only.
    async fn deck_status(&self, deck_id: &str) -> Result<DeckInfo, ProviderError>;
}

// Wire shapes of the deck API. Every response carries `success`; a false
// value with a 200 status is how the API reports an unknown deck id.

#[derive(Debug, Deserialize)]
struct DeckResponse {
    success: bool,
    deck_id: String,
    remaining: u32,
}

#[derive(Debug, Deserialize)]
struct DrawResponse {
    success: bool,
    #[allow(dead_code)]
    deck_id: String,
    remaining: u32,
    cards: Vec<ApiCard>,
}

#[derive(Debug, Deserialize)]
struct ApiCard {
    code: String,
    value: String,
    suit: String,
    image: String,
}

impl ApiCard {
    fn into_drawn(self) -> Result<DrawnCard, ProviderError> {
        let card = Card::from_api_values(&self.value, &self.suit)?;
        Ok(DrawnCard {
            card,
            code: self.code,
            image: self.image,
        })
    }
}

/// HTTP client for the remote deck API.
#[derive(Debug, Clone)]
pub struct DeckApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl DeckApiClient {
    /// `base_url` is the service root without a trailing slash, e.g.
    /// `https://deckofcardsapi.com`. Pointing it at a local mock server is
    /// how the client is tested.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_deck(&self, path: &str) -> Result<DeckInfo, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "deck api request");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: DeckResponse = response.json().await?;
        if !body.success {
            return Err(ProviderError::InvalidDeck(format!(
                "provider rejected deck request for {path}"
            )));
        }
        Ok(DeckInfo {
            deck_id: body.deck_id,
            remaining: body.remaining,
        })
    }
}

#[async_trait]
impl DeckProvider for DeckApiClient {
    async fn initialize_deck(&self) -> Result<DeckInfo, ProviderError> {
        self.get_deck("/api/deck/new/shuffle/?deck_count=1").await
    }

    async fn draw_cards(
        &self,
        deck_id: &str,
        count: u32,
    ) -> Result<Vec<DrawnCard>, ProviderError> {
        let url = format!("{}/api/deck/{}/draw/?count={}", self.base_url, deck_id, count);
        tracing::debug!(url = %url, count, "drawing cards");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: DrawResponse = response.json().await?;

        if !body.success {
            return Err(ProviderError::InvalidDeck(format!(
                "provider rejected draw from deck {deck_id}"
            )));
        }
        if body.cards.len() as u32 != count {
            return Err(ProviderError::InvalidDeck(format!(
                "deck {} exhausted: asked for {}, got {} ({} remaining)",
                deck_id,
                count,
                body.cards.len(),
                body.remaining
            )));
        }

        body.cards.into_iter().map(ApiCard::into_drawn).collect()
    }

    async fn reshuffle(&self, deck_id: &str) -> Result<DeckInfo, ProviderError> {
        self.get_deck(&format!("/api/deck/{deck_id}/shuffle/")).await
    }

    async fn deck_status(&self, deck_id: &str) -> Result<DeckInfo, ProviderError> {
        self.get_deck(&format!("/api/deck/{deck_id}")).await
    }
}

impl crate::errors::IntoErrorResponse for ProviderError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            ProviderError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            ProviderError::InvalidDeck(_) => StatusCode::BAD_GATEWAY,
            ProviderError::BadCard(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ProviderError::Unavailable(_) => "provider_unavailable",
            ProviderError::InvalidDeck(_) => "invalid_deck",
            ProviderError::BadCard(_) => "corrupt_card_data",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            ProviderError::BadCard(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Server,
        }
    }
}
