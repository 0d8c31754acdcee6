//! Frame capture: a subscriber end that tests can drain.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;

/// Receiving half of a subscriber channel with JSON helpers.
#[derive(Debug)]
pub struct FrameSink {
    rx: mpsc::Receiver<Arc<str>>,
}

impl FrameSink {
    /// Creates a sink and the sender to hand to the hub.
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<Arc<str>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }

    /// Returns every frame that has already arrived, decoded as JSON.
    ///
    /// # Panics
    ///
    /// Panics if a frame is not valid JSON.
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(raw) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&raw).expect("frame is valid JSON"));
        }
        frames
    }

    /// Waits up to one second for the next frame.
    ///
    /// # Panics
    ///
    /// Panics if a frame is not valid JSON.
    pub async fn next(&mut self) -> Option<Value> {
        match tokio::time::timeout(Duration::from_secs(1), self.rx.recv()).await {
            Ok(Some(raw)) => Some(serde_json::from_str(&raw).expect("frame is valid JSON")),
            Ok(None) | Err(_) => None,
        }
    }

    /// Waits for exactly `count` frames, returning what arrived in time.
    pub async fn take(&mut self, count: usize) -> Vec<Value> {
        let mut frames = Vec::with_capacity(count);
        while frames.len() < count {
            match self.next().await {
                Some(frame) => frames.push(frame),
                None => break,
            }
        }
        frames
    }

    /// Returns `true` once the hub has dropped the sending half.
    pub async fn is_closed(&mut self) -> bool {
        matches!(
            tokio::time::timeout(Duration::from_secs(1), self.rx.recv()).await,
            Ok(None)
        )
    }
}
