use std::sync::Arc;

use serde::Deserialize;
use warp::reply::{self, Response};
use warp::Reply;

use crate::errors::IntoErrorResponse;
use crate::history::HistoryStore;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// GET `/api/history` - recent settled rounds, newest first.
pub async fn get_recent_rounds(query: HistoryQuery, history: Arc<HistoryStore>) -> Response {
    match history.recent_rounds(query.limit) {
        Ok(rounds) => reply::json(&rounds).into_response(),
        Err(err) => err.into_http_response(),
    }
}

/// GET `/api/history/stats` - aggregate outcome statistics.
pub async fn get_statistics(history: Arc<HistoryStore>) -> Response {
    match history.calculate_stats() {
        Ok(stats) => reply::json(&stats).into_response(),
        Err(err) => err.into_http_response(),
    }
}
