//! # blackjack-web: server-rendered Blackjack over a remote deck API
//!
//! A warp HTTP server around a single [`session::GameSession`]. All card
//! randomness lives in the remote deck service behind the
//! [`provider::DeckProvider`] trait; the rules themselves come from the
//! `blackjack-engine` crate. Round triggers (`/deal`, `/hit`, `/stand`,
//! `/shuffle`) each perform one state-machine transition and respond with
//! the freshly rendered table.

pub mod errors;
pub mod handlers;
pub mod history;
pub mod logging;
pub mod provider;
pub mod server;
pub mod session;
pub mod static_handler;
pub mod view;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use history::{HistoryError, HistoryStore, RoundRecord, RoundStatistics};
pub use logging::init_logging;
pub use provider::{DeckApiClient, DeckInfo, DeckProvider, DrawnCard, ProviderError};
pub use server::{
    AppContext, ServerConfig, ServerError, ServerHandle, WebServer, DEFAULT_DECK_API_URL,
};
pub use session::{CardView, DeckView, GameSession, GameSnapshot, SeatSnapshot, SessionError};
pub use static_handler::{StaticError, StaticHandler};
