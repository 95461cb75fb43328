//! The single process-wide game session and its round state machine.
//!
//! Phases move `AwaitingDeal -> PlayerTurn -> RoundSettled -> AwaitingDeal`
//! in response to the deal/hit/stand/shuffle triggers. Every operation
//! validates its transition against the engine's phase table before
//! touching anything, stages all provider draws off to the side, and
//! commits only on full success, so a failed remote call leaves the
//! session exactly as it was and the same action can simply be retried.

use std::sync::Arc;

use blackjack_engine::errors::InvalidTransition;
use blackjack_engine::hand::Hand;
use blackjack_engine::outcome::{evaluate_round, RoundOutcome};
use blackjack_engine::round::{RoundAction, RoundPhase};
use blackjack_engine::dealer;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::history::{HistoryStore, RoundRecord};
use crate::provider::{DeckProvider, DrawnCard, ProviderError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// One seat at the table: the scored hand plus the provider's face-image
/// URL for each card, kept in draw order.
#[derive(Debug, Clone, Default)]
struct Seat {
    hand: Hand,
    codes: Vec<String>,
    images: Vec<String>,
}

impl Seat {
    fn take(&mut self, drawn: DrawnCard) {
        self.hand.push(drawn.card);
        self.codes.push(drawn.code);
        self.images.push(drawn.image);
    }

    fn clear(&mut self) {
        self.hand.clear();
        self.codes.clear();
        self.images.clear();
    }

    fn snapshot(&self) -> SeatSnapshot {
        SeatSnapshot {
            cards: self
                .hand
                .cards()
                .iter()
                .zip(self.codes.iter().zip(self.images.iter()))
                .map(|(card, (code, image))| CardView {
                    label: card.label(),
                    code: code.clone(),
                    image: image.clone(),
                })
                .collect(),
            score: self.hand.score(),
        }
    }
}

/// Everything that mutates during a round, confined behind one mutex.
#[derive(Debug)]
struct RoundState {
    deck_id: String,
    remaining: u32,
    player: Seat,
    dealer: Seat,
    phase: RoundPhase,
    outcome: Option<RoundOutcome>,
}

/// The single game session. Created once at startup with one remote deck
/// initialization; shared via `Arc` and mutated one action at a time.
pub struct GameSession {
    provider: Arc<dyn DeckProvider>,
    history: Option<Arc<HistoryStore>>,
    state: Mutex<RoundState>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("history", &self.history.is_some())
            .finish()
    }
}

impl GameSession {
    /// Acquires a fresh shuffled deck from the provider. Failure here is
    /// fatal to startup: without a deck the session cannot serve requests.
    pub async fn connect(provider: Arc<dyn DeckProvider>) -> Result<Self, SessionError> {
        Self::connect_with_history(provider, None).await
    }

    pub async fn connect_with_history(
        provider: Arc<dyn DeckProvider>,
        history: Option<Arc<HistoryStore>>,
    ) -> Result<Self, SessionError> {
        let deck = provider.initialize_deck().await?;
        tracing::info!(deck_id = %deck.deck_id, remaining = deck.remaining, "deck initialized");

        Ok(Self {
            provider,
            history,
            state: Mutex::new(RoundState {
                deck_id: deck.deck_id,
                remaining: deck.remaining,
                player: Seat::default(),
                dealer: Seat::default(),
                phase: RoundPhase::AwaitingDeal,
                outcome: None,
            }),
        })
    }

    /// Deals two cards to each side, interleaved player/dealer, and moves
    /// to the player's turn. A natural on either side settles the round
    /// immediately.
    pub async fn deal(&self) -> Result<GameSnapshot, SessionError> {
        let mut state = self.state.lock().await;
        state.phase.check(RoundAction::Deal)?;

        let mut player = Seat::default();
        let mut dealer = Seat::default();
        for _ in 0..2 {
            player.take(self.draw_one(&state.deck_id).await?);
            dealer.take(self.draw_one(&state.deck_id).await?);
        }
        let status = self.provider.deck_status(&state.deck_id).await?;

        tracing::info!(
            player = %player.hand.labels(),
            dealer = %dealer.hand.labels(),
            "cards in play"
        );

        state.player = player;
        state.dealer = dealer;
        state.remaining = status.remaining;
        state.outcome = None;
        state.phase = RoundPhase::PlayerTurn;

        if state.player.hand.is_blackjack() || state.dealer.hand.is_blackjack() {
            self.settle(&mut state);
        }

        Ok(state.snapshot())
    }

    /// Draws one card for the player. A bust settles the round at once as
    /// `PlayerBust`; the dealer does not draw against a busted player.
    pub async fn hit(&self) -> Result<GameSnapshot, SessionError> {
        let mut state = self.state.lock().await;
        state.phase.check(RoundAction::Hit)?;

        let drawn = self.draw_one(&state.deck_id).await?;
        let status = self.provider.deck_status(&state.deck_id).await?;

        tracing::info!(card = %drawn.card.label(), "player hits");

        state.player.take(drawn);
        state.remaining = status.remaining;

        if state.player.hand.is_bust() {
            self.settle(&mut state);
        }

        Ok(state.snapshot())
    }

    /// Runs the dealer: one card per policy hit, sequential round-trips,
    /// until the dealer stands or busts; then evaluates and settles.
    pub async fn stand(&self) -> Result<GameSnapshot, SessionError> {
        let mut state = self.state.lock().await;
        state.phase.check(RoundAction::Stand)?;

        let mut dealer = state.dealer.clone();
        while dealer::dealer_should_hit(&state.player.hand, &dealer.hand) {
            let drawn = self.draw_one(&state.deck_id).await?;
            tracing::info!(card = %drawn.card.label(), "dealer hits");
            dealer.take(drawn);
        }
        let status = self.provider.deck_status(&state.deck_id).await?;

        state.dealer = dealer;
        state.remaining = status.remaining;
        self.settle(&mut state);

        Ok(state.snapshot())
    }

    /// Reshuffles the remote deck and resets the table for a new round.
    pub async fn shuffle(&self) -> Result<GameSnapshot, SessionError> {
        let mut state = self.state.lock().await;
        state.phase.check(RoundAction::Shuffle)?;

        let deck = self.provider.reshuffle(&state.deck_id).await?;
        tracing::info!(deck_id = %deck.deck_id, remaining = deck.remaining, "deck reshuffled");

        state.remaining = deck.remaining;
        state.player.clear();
        state.dealer.clear();
        state.outcome = None;
        state.phase = RoundPhase::AwaitingDeal;

        Ok(state.snapshot())
    }

    /// Read-only view of the table for rendering. Never mutates.
    pub async fn snapshot(&self) -> GameSnapshot {
        self.state.lock().await.snapshot()
    }

    async fn draw_one(&self, deck_id: &str) -> Result<DrawnCard, SessionError> {
        let mut cards = self.provider.draw_cards(deck_id, 1).await?;
        cards.pop().ok_or_else(|| {
            SessionError::Provider(ProviderError::InvalidDeck(format!(
                "deck {deck_id} returned an empty draw"
            )))
        })
    }

    /// Records the outcome, marks the round settled and appends it to the
    /// in-memory history. Caller holds the state lock.
    fn settle(&self, state: &mut RoundState) {
        let outcome = evaluate_round(&state.player.hand, &state.dealer.hand);
        tracing::info!(outcome = %outcome, "round settled");

        state.outcome = Some(outcome);
        state.phase = RoundPhase::RoundSettled;

        if let Some(history) = &self.history {
            let record = RoundRecord {
                outcome,
                player_score: state.player.hand.score(),
                dealer_score: state.dealer.hand.score(),
                player_cards: state.player.codes.clone(),
                dealer_cards: state.dealer.codes.clone(),
                settled_at: chrono::Utc::now().to_rfc3339(),
            };
            if let Err(err) = history.record_round(record) {
                tracing::error!(error = %err, "failed to record round history");
            }
        }
    }
}

impl RoundState {
    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            player: self.player.snapshot(),
            dealer: self.dealer.snapshot(),
            // The dealer's hole card stays face down until the player's
            // turn is over.
            dealer_hole_hidden: self.phase == RoundPhase::PlayerTurn,
            outcome: self.outcome,
            message: self
                .outcome
                .map(|o| o.message().to_string())
                .unwrap_or_else(|| "Game in play.".to_string()),
            deck: DeckView {
                deck_id: self.deck_id.clone(),
                remaining: self.remaining,
            },
            available_actions: self.phase.available_actions(),
        }
    }
}

/// One rendered card: readable label, compact provider code, face image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub label: String,
    pub code: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub cards: Vec<CardView>,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckView {
    pub deck_id: String,
    pub remaining: u32,
}

/// Immutable view of the session handed to the view layer and the JSON
/// API after every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: RoundPhase,
    pub player: SeatSnapshot,
    pub dealer: SeatSnapshot,
    pub dealer_hole_hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RoundOutcome>,
    pub message: String,
    pub deck: DeckView,
    pub available_actions: Vec<RoundAction>,
}

impl crate::errors::IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use crate::errors::IntoErrorResponse as _;
        use warp::http::StatusCode;
        match self {
            SessionError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            SessionError::Provider(err) => err.status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        use crate::errors::IntoErrorResponse as _;
        match self {
            SessionError::InvalidTransition(_) => "invalid_transition",
            SessionError::Provider(err) => err.error_code(),
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::InvalidTransition(err) => Some(serde_json::json!({
                "phase": err.phase,
                "action": err.action,
            })),
            SessionError::Provider(_) => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::IntoErrorResponse as _;
        match self {
            SessionError::InvalidTransition(_) => crate::errors::ErrorSeverity::Client,
            SessionError::Provider(err) => err.severity(),
        }
    }
}
