//! Session routes: creation and the live game-state socket.

use axum::extract::State;
use axum::response::Redirect;
use axum::{Router, routing::get};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::identity::identify;
use crate::state::AppState;
use crate::ws;

/// GET|POST /new_game
///
/// Creates a session and redirects the caller to it.
#[instrument(skip(state, jar))]
async fn new_game(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, player_id) = identify(jar);
    let session = state.registry.create();
    info!(session_id = %session.id(), %player_id, "new game");
    (jar, Redirect::to(&format!("/game?id={}", session.id())))
}

/// Returns the router for session routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new_game", get(new_game).post(new_game))
        .route("/game_state", get(ws::game_state))
}
