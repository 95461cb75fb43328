//! In-memory record of settled rounds. Lives and dies with the process;
//! there is deliberately no persistence behind it.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

use blackjack_engine::outcome::RoundOutcome;

/// One settled round as it looked at the moment of settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub outcome: RoundOutcome,
    pub player_score: u8,
    pub dealer_score: u8,
    /// Compact provider codes ("AS", "KH", ...) in draw order.
    pub player_cards: Vec<String>,
    pub dealer_cards: Vec<String>,
    /// RFC3339 settlement timestamp.
    pub settled_at: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history storage poisoned")]
    StoragePoisoned,
}

/// Round history storage and aggregate statistics.
#[derive(Debug, Default)]
pub struct HistoryStore {
    rounds: RwLock<Vec<RoundRecord>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_round(&self, record: RoundRecord) -> Result<(), HistoryError> {
        let mut rounds = self
            .rounds
            .write()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        rounds.push(record);
        Ok(())
    }

    /// Most recent rounds first. `limit` defaults to 100.
    pub fn recent_rounds(&self, limit: Option<usize>) -> Result<Vec<RoundRecord>, HistoryError> {
        let rounds = self
            .rounds
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        let limit = limit.unwrap_or(100);
        Ok(rounds.iter().rev().take(limit).cloned().collect())
    }

    pub fn total_rounds(&self) -> Result<usize, HistoryError> {
        let rounds = self
            .rounds
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(rounds.len())
    }

    pub fn calculate_stats(&self) -> Result<RoundStatistics, HistoryError> {
        let rounds = self
            .rounds
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;

        let mut stats = RoundStatistics {
            total_rounds: rounds.len(),
            ..RoundStatistics::default()
        };

        for round in rounds.iter() {
            if round.outcome.player_won() {
                stats.player_wins += 1;
            } else if round.outcome == RoundOutcome::Push {
                stats.pushes += 1;
            } else {
                stats.dealer_wins += 1;
            }
        }

        if stats.total_rounds > 0 {
            stats.player_win_rate =
                (stats.player_wins as f64 / stats.total_rounds as f64) * 100.0;
        }

        Ok(stats)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundStatistics {
    pub total_rounds: usize,
    pub player_wins: usize,
    pub dealer_wins: usize,
    pub pushes: usize,
    /// Percentage of settled rounds the player took.
    pub player_win_rate: f64,
}

impl crate::errors::IntoErrorResponse for HistoryError {
    fn status_code(&self) -> warp::http::StatusCode {
        warp::http::StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_code(&self) -> &'static str {
        "history_storage_error"
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        crate::errors::ErrorSeverity::Critical
    }
}
