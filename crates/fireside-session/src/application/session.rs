//! The session actor.
//!
//! A [`Session`] owns one story. Every operation takes the session's lock
//! for its whole duration, including the narrator round-trip, so effects of
//! two operations never interleave. Deltas are handed to the hub while the
//! lock is held, which makes the hub's queue order equal to the order the
//! mutations happened in.

use std::sync::Arc;

use fireside_core::error::DomainError;
use fireside_core::narrator::{NarrationRequest, NarratorResponse};
use fireside_hub::{Frame, Outbox, Subscription};
use fireside_narrative::chronicle::CHAT_HISTORY_PATH;
use fireside_narrative::memory::player_entity;
use fireside_narrative::scenario::scenario_text;
use fireside_narrative::{CampaignLength, ChatMessage, Chronicle, ViolenceLevel, directive};
use serde_json::json;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::application::context::SessionContext;
use crate::domain::player::{Player, player_path};
use crate::domain::state::{Phase, SessionState};

/// Narration shown when the narrator fails or does not answer in time.
pub const NARRATION_UNAVAILABLE: &str =
    "The narrator loses the thread for a moment. Tell them what you do next.";

/// One running story and its viewers.
pub struct Session {
    id: Uuid,
    state: Mutex<SessionState>,
    context: SessionContext,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Session {
    #[must_use]
    pub fn new(id: Uuid, context: SessionContext) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState::new(id)),
            context,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A copy of the current document.
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Subscribes a viewer, greeting it with the current document.
    ///
    /// The snapshot is taken and the subscription enqueued under the session
    /// lock, so the viewer sees the snapshot followed by exactly the deltas
    /// of every later mutation.
    #[instrument(skip(self, outbox), fields(session_id = %self.id))]
    pub async fn attach(&self, connection_id: Uuid, outbox: Outbox) -> Subscription {
        let state = self.state.lock().await;
        // `json!` cannot fail on the session document: every map is keyed by `String`.
        self.context.hub.subscribe_with_greeting(
            self.id,
            connection_id,
            outbox,
            Frame::full_overwrite(json!(&*state)),
        )
    }

    /// Adds a player unless already present. Returns whether one was added.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn add_player(&self, player_id: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.players.contains_key(player_id) {
            return false;
        }
        let player = Player::new(player_id);
        self.publish(Frame::set(player_path(player_id), json!(&player)));
        let _ = state.players.insert(player_id.to_owned(), player);
        info!("player joined");
        true
    }

    /// Replaces a known player's profile. Unknown players are ignored.
    #[instrument(skip(self, player), fields(session_id = %self.id, player_id = %player.id))]
    pub async fn set_player_description(&self, player: Player) {
        let mut state = self.state.lock().await;
        let Some(slot) = state.players.get_mut(&player.id) else {
            warn!("description for unknown player ignored");
            return;
        };
        slot.description = player.description;
        self.publish(Frame::set(player_path(&slot.id), json!(&*slot)));
    }

    /// Starts the story from a bundled scenario.
    ///
    /// Only valid in [`Phase::Init`]; an unknown scenario leaves the session
    /// untouched.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn start(self: &Arc<Self>, scenario: &str, violence_level: u8, duration: u8) {
        {
            let mut state = self.state.lock().await;
            if state.state != Phase::Init {
                info!("session already running, start ignored");
                return;
            }
            let text = match scenario_text(scenario) {
                Ok(text) => text,
                Err(error) => {
                    warn!(%error, "start ignored");
                    return;
                }
            };

            state.state = Phase::Running;
            state.accepting_input = false;
            state.roll = None;
            state.ai = Chronicle::default();
            state.ai.memory.seed_plan(directive::opening_seed(
                text,
                ViolenceLevel::from_level(violence_level),
                CampaignLength::from_level(duration),
            ));
            let profiles: Vec<(String, Vec<String>)> = state
                .players
                .values()
                .map(|player| (player_entity(&player.id), player.description.memory_lines()))
                .collect();
            for (entity, lines) in profiles {
                state.ai.memory.set_entity(entity, lines);
            }
            // Infallible, see `attach`.
            self.publish(Frame::full_overwrite(json!(&*state)));

            let response = self.narrate(&state, directive::opening()).await;
            self.continue_with(&mut state, &response);
            info!(accepting_input = state.accepting_input, "session started");
        }
        self.spawn_enrichment();
    }

    /// Takes one player's input and asks the narrator to continue.
    ///
    /// Ignored unless the session is running and accepting input.
    #[instrument(skip(self, input), fields(session_id = %self.id))]
    pub async fn player_input(self: &Arc<Self>, player_id: &str, input: &str) {
        {
            let mut state = self.state.lock().await;
            if state.state != Phase::Running {
                info!("session not running, input ignored");
                return;
            }
            if !state.can_take_input() {
                info!("session not accepting input, input ignored");
                return;
            }

            state.accepting_input = false;
            self.publish(Frame::set("accepting_input", json!(false)));

            let message = ChatMessage::user(player_id, input);
            self.publish(Frame::push(CHAT_HISTORY_PATH, json!(&message)));
            let _ = state.ai.push(message);

            let response = self.narrate(&state, directive::after_input(player_id)).await;
            self.continue_with(&mut state, &response);
        }
        self.spawn_enrichment();
    }

    /// Resolves the pending dice check and lets the narrator continue.
    ///
    /// Ignored unless a check is pending.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn continue_after_roll(self: &Arc<Self>) {
        {
            let mut state = self.state.lock().await;
            if state.state != Phase::Running {
                info!("session not running, continue ignored");
                return;
            }
            let Some(roll) = state.roll.take() else {
                info!("no pending roll, continue ignored");
                return;
            };
            self.publish(Frame::set("roll", serde_json::Value::Null));
            debug!(result = roll.result, difficulty = roll.difficulty, "resolving roll");

            let response = self.narrate(&state, directive::after_roll(&roll)).await;
            self.continue_with(&mut state, &response);
        }
        self.spawn_enrichment();
    }

    /// Records a narrator response and settles the roll and input state.
    fn continue_with(&self, state: &mut SessionState, response: &NarratorResponse) {
        let stamp = self.context.clock.timestamp();
        let index = state.ai.record(response, &stamp);
        // Chat messages and rolls hold only strings and integers; encoding cannot fail.
        self.publish(Frame::push(
            CHAT_HISTORY_PATH,
            json!(&state.ai.chat_history[index]),
        ));

        state.roll = response
            .roll_dice
            .map(|request| self.context.dice.roll(request.difficulty));
        self.publish(Frame::set("roll", json!(state.roll)));

        if state.roll.is_none() {
            state.accepting_input = true;
            self.publish(Frame::set("accepting_input", json!(true)));
        }
    }

    /// Asks the narrator for the next beat. Failures and timeouts degrade to
    /// [`NARRATION_UNAVAILABLE`] with no roll.
    async fn narrate(&self, state: &SessionState, instruction: String) -> NarratorResponse {
        let request = NarrationRequest {
            session_id: self.id,
            instruction,
            context: state.ai.context(),
        };
        let limit = self.context.collaborator_timeout;
        let outcome = tokio::time::timeout(limit, self.context.narrator.narrate(request))
            .await
            .unwrap_or(Err(DomainError::Timeout {
                collaborator: "narrator",
                after: limit,
            }));
        outcome.unwrap_or_else(|error| {
            warn!(%error, "narration failed");
            NarratorResponse {
                narrator_text: NARRATION_UNAVAILABLE.to_owned(),
                ..NarratorResponse::default()
            }
        })
    }

    /// Queues an audio pass for this session on the shared tracker.
    fn spawn_enrichment(self: &Arc<Self>) {
        let session = Arc::clone(self);
        let span = info_span!("audio_enrichment", session_id = %self.id);
        let _ = self.context.tasks.spawn(
            async move {
                let filled = session.fill_missing_audio().await;
                debug!(filled, "audio pass finished");
            }
            .instrument(span),
        );
    }

    pub(crate) fn publish(&self, frame: Frame) {
        self.context.hub.publish(self.id, frame);
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    pub(crate) fn context(&self) -> &SessionContext {
        &self.context
    }
}
