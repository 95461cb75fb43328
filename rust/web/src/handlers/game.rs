//! Round-phase trigger handlers. Each trigger maps 1:1 to one session
//! transition and replies with the server-rendered page for the updated
//! snapshot; `/api/state` exposes the same snapshot as JSON.

use std::sync::Arc;

use warp::reply::{self, html, Response};
use warp::Reply;

use crate::session::{GameSession, SessionError};
use crate::view;

/// GET `/` - renders the current table without acting on it.
pub async fn page(session: Arc<GameSession>) -> Response {
    let snapshot = session.snapshot().await;
    html(view::render_page(&snapshot)).into_response()
}

/// GET `/deal` - starts a round: two cards each, player's turn.
pub async fn deal(session: Arc<GameSession>) -> Response {
    render_transition(session.deal().await)
}

/// GET `/hit` - one more card for the player; a bust settles the round.
pub async fn hit(session: Arc<GameSession>) -> Response {
    render_transition(session.hit().await)
}

/// GET `/stand` - the dealer draws to its policy and the round settles.
pub async fn stand(session: Arc<GameSession>) -> Response {
    render_transition(session.stand().await)
}

/// GET `/shuffle` - reshuffles the deck and clears the table.
pub async fn shuffle(session: Arc<GameSession>) -> Response {
    render_transition(session.shuffle().await)
}

/// GET `/api/state` - the current snapshot as JSON.
pub async fn api_state(session: Arc<GameSession>) -> Response {
    let snapshot = session.snapshot().await;
    reply::json(&snapshot).into_response()
}

fn render_transition(
    result: Result<crate::session::GameSnapshot, SessionError>,
) -> Response {
    match result {
        Ok(snapshot) => html(view::render_page(&snapshot)).into_response(),
        Err(err) => session_error(err),
    }
}

fn session_error(err: SessionError) -> Response {
    use crate::errors::IntoErrorResponse;
    err.into_http_response()
}
