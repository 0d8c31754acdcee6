//! Shared wiring for session tests.

use std::sync::Arc;

use fireside_dice::KarmicDice;
use fireside_hub::{Hub, Subscription};
use fireside_test_support::{FixedClock, FrameSink, RecordingSpeech, ScriptedNarrator, SequenceRng};
use uuid::Uuid;

use crate::application::context::SessionContext;
use crate::application::session::Session;

pub(crate) struct Fixture {
    pub hub: Hub,
    pub narrator: Arc<ScriptedNarrator>,
    pub speech: Arc<RecordingSpeech>,
    pub context: SessionContext,
}

impl Fixture {
    pub fn new(narrator: ScriptedNarrator) -> Self {
        Self::with(narrator, RecordingSpeech::new(), vec![5])
    }

    /// `rolls` feeds the base rolls of the shared dice.
    pub fn with(narrator: ScriptedNarrator, speech: RecordingSpeech, rolls: Vec<u32>) -> Self {
        let (hub, _task) = Hub::spawn();
        let narrator = Arc::new(narrator);
        let speech = Arc::new(speech);
        let context = SessionContext::new(
            hub.clone(),
            narrator.clone(),
            speech.clone(),
            Arc::new(KarmicDice::new(SequenceRng::new(rolls))),
            Arc::new(FixedClock::default()),
        );
        Self {
            hub,
            narrator,
            speech,
            context,
        }
    }

    pub fn session(&self) -> Arc<Session> {
        Arc::new(Session::new(Uuid::new_v4(), self.context.clone()))
    }

    /// Attaches a viewer and discards its greeting.
    pub async fn watch(&self, session: &Session) -> (Subscription, FrameSink) {
        let (outbox, mut sink) = FrameSink::channel(256);
        let subscription = session.attach(Uuid::new_v4(), outbox).await;
        let greeting = sink.next().await.expect("greeting");
        assert_eq!(greeting["method"], "full_overwrite");
        (subscription, sink)
    }

    /// Waits until every spawned audio pass is done and the hub has
    /// delivered everything published so far.
    pub async fn settle(&self, session: &Session) {
        self.context.tasks.close();
        self.context.tasks.wait().await;
        self.context.tasks.reopen();
        let _ = self.hub.subscriber_count(session.id()).await;
    }

    /// Waits until the hub has delivered everything published so far.
    pub async fn flush(&self, session: &Session) {
        let _ = self.hub.subscriber_count(session.id()).await;
    }
}

/// `(method, path)` of each frame, for order assertions.
pub(crate) fn shape(frames: &[serde_json::Value]) -> Vec<(String, String)> {
    frames
        .iter()
        .map(|frame| {
            (
                frame["method"].as_str().unwrap_or_default().to_owned(),
                frame["path"].as_str().unwrap_or_default().to_owned(),
            )
        })
        .collect()
}

pub(crate) fn frames(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(method, path)| ((*method).to_owned(), (*path).to_owned()))
        .collect()
}
