//! Live session connections.
//!
//! Each viewer holds one WebSocket. The connection joins the caller as a
//! player, subscribes to the session's frames, and then reads commands until
//! the socket closes or sends something that is not a valid frame. Frames
//! from the hub are forwarded by a separate writer task.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use fireside_session::{Player, Session};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::identify;
use crate::protocol::{self, ClientCommand};
use crate::state::AppState;

/// Frames a connection may fall behind by before the hub drops it.
pub const OUTBOX_CAPACITY: usize = 256;

#[derive(Debug, Deserialize)]
pub struct GameQuery {
    pub id: Uuid,
}

/// GET /api/game_state?id=<session>
#[instrument(skip(state, jar, upgrade), fields(session_id = %query.id))]
pub async fn game_state(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
    jar: CookieJar,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let session = state.registry.get(query.id)?;
    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let (jar, player_id) = identify(jar);
    let span = info_span!("connection", session_id = %query.id, %player_id);

    Ok((
        jar,
        upgrade.on_upgrade(move |socket| serve(socket, state, session, player_id).instrument(span)),
    )
        .into_response())
}

async fn serve(socket: WebSocket, state: AppState, session: Arc<Session>, player_id: String) {
    let connection_id = Uuid::new_v4();
    let _ = session.add_player(&player_id).await;

    let (outbox, mut frames) = mpsc::channel::<Arc<str>>(OUTBOX_CAPACITY);
    let subscription = session.attach(connection_id, outbox).await;
    info!(%connection_id, "viewer connected");

    let (mut sink, mut stream) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if sink.send(Message::Text(frame.to_string().into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => match protocol::decode(text.as_str()) {
                Ok(Some(command)) => {
                    state
                        .registry
                        .tasks()
                        .track_future(dispatch(&session, &player_id, command))
                        .await;
                }
                Ok(None) => debug!("unrecognized action ignored"),
                Err(error) => {
                    warn!(%error, "malformed frame, closing connection");
                    break;
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    drop(subscription);
    let _ = writer.await;
    info!(%connection_id, "viewer disconnected");
}

async fn dispatch(session: &Arc<Session>, player_id: &str, command: ClientCommand) {
    match command {
        ClientCommand::SetPlayerCharacterDescription { player } => {
            session
                .set_player_description(Player {
                    id: player_id.to_owned(),
                    description: player,
                })
                .await;
        }
        ClientCommand::Start {
            scenario,
            violence_level,
            duration,
        } => session.start(&scenario, violence_level, duration).await,
        ClientCommand::UserInput { input } => session.player_input(player_id, &input).await,
        ClientCommand::ContinueAfterRoll => session.continue_after_roll().await,
    }
}
