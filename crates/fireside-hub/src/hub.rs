//! The hub actor and its handle.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::frame::Frame;

/// Sending half of a connection's outbound queue. The connection's writer
/// task owns the receiving half and copies frames onto the socket.
pub type Outbox = mpsc::Sender<Arc<str>>;

#[derive(Debug)]
enum Request {
    Subscribe {
        session_id: Uuid,
        connection_id: Uuid,
        token: u64,
        outbox: Outbox,
        greeting: Option<Frame>,
    },
    Unsubscribe {
        session_id: Uuid,
        connection_id: Uuid,
        token: u64,
    },
    Publish {
        session_id: Uuid,
        frame: Frame,
    },
    Count {
        session_id: Uuid,
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// Cloneable handle to the hub actor.
///
/// Every method only enqueues a request, so callers never wait on slow
/// subscribers.
#[derive(Debug, Clone)]
pub struct Hub {
    tx: mpsc::UnboundedSender<Request>,
    next_token: Arc<AtomicU64>,
}

impl Hub {
    /// Starts the actor on the current runtime.
    ///
    /// The returned task finishes after [`Hub::shutdown`] once every request
    /// queued before it has been handled, or when every handle is dropped.
    #[must_use]
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(HubActor::default().run(rx));
        let hub = Self {
            tx,
            next_token: Arc::new(AtomicU64::new(1)),
        };
        (hub, task)
    }

    /// Registers `outbox` for every later frame of `session_id`.
    ///
    /// Subscribing the same connection again replaces its outbox, so a
    /// connection never receives a frame twice.
    #[must_use]
    pub fn subscribe(&self, session_id: Uuid, connection_id: Uuid, outbox: Outbox) -> Subscription {
        self.register(session_id, connection_id, outbox, None)
    }

    /// Like [`Hub::subscribe`], but delivers `greeting` to this subscriber
    /// alone, ahead of every frame published after it.
    #[must_use]
    pub fn subscribe_with_greeting(
        &self,
        session_id: Uuid,
        connection_id: Uuid,
        outbox: Outbox,
        greeting: Frame,
    ) -> Subscription {
        self.register(session_id, connection_id, outbox, Some(greeting))
    }

    fn register(
        &self,
        session_id: Uuid,
        connection_id: Uuid,
        outbox: Outbox,
        greeting: Option<Frame>,
    ) -> Subscription {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.send(Request::Subscribe {
            session_id,
            connection_id,
            token,
            outbox,
            greeting,
        });
        Subscription {
            hub: self.clone(),
            session_id,
            connection_id,
            token,
        }
    }

    /// Removes a subscription. Safe to call repeatedly.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.send(Request::Unsubscribe {
            session_id: subscription.session_id,
            connection_id: subscription.connection_id,
            token: subscription.token,
        });
    }

    /// Queues `frame` for every current subscriber of `session_id`.
    pub fn publish(&self, session_id: Uuid, frame: Frame) {
        self.send(Request::Publish { session_id, frame });
    }

    /// Number of subscribers currently registered for `session_id`.
    ///
    /// Answered in queue order, so it reflects every request sent before it.
    pub async fn subscriber_count(&self, session_id: Uuid) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Count { session_id, reply });
        rx.await.unwrap_or(0)
    }

    /// Asks the actor to stop after draining the requests already queued.
    pub fn shutdown(&self) {
        self.send(Request::Shutdown);
    }

    fn send(&self, request: Request) {
        if self.tx.send(request).is_err() {
            debug!("hub stopped, request dropped");
        }
    }
}

/// Handle for one connection's registration. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    hub: Hub,
    session_id: Uuid,
    connection_id: Uuid,
    token: u64,
}

impl Subscription {
    /// The session this subscription watches.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The connection that owns this subscription.
    #[must_use]
    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Removes the subscription now instead of on drop.
    pub fn unsubscribe(&self) {
        self.hub.unsubscribe(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self);
    }
}

#[derive(Debug)]
struct Subscriber {
    token: u64,
    outbox: Outbox,
}

/// Subscriber sets keyed by session, then by connection.
#[derive(Debug, Default)]
struct HubActor {
    sessions: HashMap<Uuid, HashMap<Uuid, Subscriber>>,
}

impl HubActor {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = rx.recv().await {
            if self.handle(request).is_break() {
                break;
            }
        }
        info!(sessions = self.sessions.len(), "hub stopped");
    }

    fn handle(&mut self, request: Request) -> ControlFlow<()> {
        match request {
            Request::Subscribe {
                session_id,
                connection_id,
                token,
                outbox,
                greeting,
            } => self.subscribe(session_id, connection_id, token, outbox, greeting),
            Request::Unsubscribe {
                session_id,
                connection_id,
                token,
            } => self.unsubscribe(session_id, connection_id, token),
            Request::Publish { session_id, frame } => self.publish(session_id, &frame),
            Request::Count { session_id, reply } => {
                let count = self.sessions.get(&session_id).map_or(0, HashMap::len);
                let _ = reply.send(count);
            }
            Request::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn subscribe(
        &mut self,
        session_id: Uuid,
        connection_id: Uuid,
        token: u64,
        outbox: Outbox,
        greeting: Option<Frame>,
    ) {
        if let Some(frame) = greeting {
            let delivered = match frame.encode() {
                Ok(encoded) => outbox.try_send(encoded).is_ok(),
                Err(e) => {
                    warn!(%session_id, error = %e, "failed to serialize greeting");
                    false
                }
            };
            if !delivered {
                warn!(%session_id, %connection_id, "greeting undeliverable, subscription refused");
                return;
            }
        }
        let _ = self
            .sessions
            .entry(session_id)
            .or_default()
            .insert(connection_id, Subscriber { token, outbox });
        debug!(%session_id, %connection_id, "subscribed");
    }

    fn unsubscribe(&mut self, session_id: Uuid, connection_id: Uuid, token: u64) {
        let Some(subscribers) = self.sessions.get_mut(&session_id) else {
            return;
        };
        if subscribers
            .get(&connection_id)
            .is_some_and(|s| s.token == token)
        {
            let _ = subscribers.remove(&connection_id);
            debug!(%session_id, %connection_id, "unsubscribed");
        }
        if subscribers.is_empty() {
            let _ = self.sessions.remove(&session_id);
        }
    }

    fn publish(&mut self, session_id: Uuid, frame: &Frame) {
        let Some(subscribers) = self.sessions.get_mut(&session_id) else {
            return;
        };
        let encoded = match frame.encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(%session_id, method = frame.method(), error = %e, "failed to serialize frame");
                return;
            }
        };

        // A subscriber that cannot take the frame is dropped rather than
        // skipped, so nobody keeps watching a state with a hole in it.
        let mut evicted = Vec::new();
        for (connection_id, subscriber) in subscribers.iter() {
            match subscriber.outbox.try_send(Arc::clone(&encoded)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(%session_id, %connection_id, "subscriber lagging, evicted");
                    evicted.push(*connection_id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(%session_id, %connection_id, "subscriber gone, removed");
                    evicted.push(*connection_id);
                }
            }
        }
        for connection_id in &evicted {
            let _ = subscribers.remove(connection_id);
        }
        debug!(
            %session_id,
            method = frame.method(),
            recipients = subscribers.len(),
            "published frame"
        );
        if subscribers.is_empty() {
            let _ = self.sessions.remove(&session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireside_test_support::FrameSink;
    use serde_json::json;

    fn numbered(n: u64) -> Frame {
        Frame::push("ai.chat_history", json!(n))
    }

    fn values(frames: &[serde_json::Value]) -> Vec<u64> {
        frames.iter().map(|f| f["value"].as_u64().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_publish_reaches_only_subscribers_of_that_session() {
        // Arrange
        let (hub, _task) = Hub::spawn();
        let session_a = Uuid::new_v4();
        let session_b = Uuid::new_v4();
        let (tx1, mut rx1) = FrameSink::channel(8);
        let (tx2, mut rx2) = FrameSink::channel(8);
        let _s1 = hub.subscribe(session_a, Uuid::new_v4(), tx1);
        let _s2 = hub.subscribe(session_b, Uuid::new_v4(), tx2);

        // Act
        hub.publish(session_a, numbered(1));
        assert_eq!(hub.subscriber_count(session_a).await, 1);

        // Assert
        assert_eq!(values(&rx1.drain()), vec![1]);
        assert!(rx2.drain().is_empty());
    }

    #[tokio::test]
    async fn test_publish_targets_subscriber_set_at_enqueue_time() {
        // Arrange
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx_a, mut rx_a) = FrameSink::channel(8);
        let (tx_b, mut rx_b) = FrameSink::channel(8);

        // Act
        let sub_a = hub.subscribe(session, Uuid::new_v4(), tx_a);
        hub.publish(session, numbered(1));
        let _sub_b = hub.subscribe(session, Uuid::new_v4(), tx_b);
        hub.publish(session, numbered(2));
        hub.unsubscribe(&sub_a);
        hub.publish(session, numbered(3));
        let _ = hub.subscriber_count(session).await;

        // Assert
        assert_eq!(values(&rx_a.drain()), vec![1, 2]);
        assert_eq!(values(&rx_b.drain()), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_concurrent_publishers_are_seen_in_one_order_by_everyone() {
        // Arrange
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx_a, mut rx_a) = FrameSink::channel(512);
        let (tx_b, mut rx_b) = FrameSink::channel(512);
        let _a = hub.subscribe(session, Uuid::new_v4(), tx_a);
        let _b = hub.subscribe(session, Uuid::new_v4(), tx_b);

        // Act
        let publishers: Vec<_> = (0..4u64)
            .map(|p| {
                let hub = hub.clone();
                tokio::spawn(async move {
                    for i in 0..50u64 {
                        hub.publish(session, numbered(p * 1000 + i));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for publisher in publishers {
            publisher.await.unwrap();
        }
        let _ = hub.subscriber_count(session).await;

        // Assert
        let seen_a = values(&rx_a.drain());
        let seen_b = values(&rx_b.drain());
        assert_eq!(seen_a.len(), 200);
        assert_eq!(seen_a, seen_b);
    }

    #[tokio::test]
    async fn test_unsubscribe_twice_is_a_no_op() {
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx, _rx) = FrameSink::channel(8);
        let sub = hub.subscribe(session, Uuid::new_v4(), tx);

        hub.unsubscribe(&sub);
        hub.unsubscribe(&sub);
        sub.unsubscribe();

        assert_eq!(hub.subscriber_count(session).await, 0);
    }

    #[tokio::test]
    async fn test_dropping_subscription_unsubscribes() {
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx, _rx) = FrameSink::channel(8);

        {
            let _sub = hub.subscribe(session, Uuid::new_v4(), tx);
            assert_eq!(hub.subscriber_count(session).await, 1);
        }

        assert_eq!(hub.subscriber_count(session).await, 0);
    }

    #[tokio::test]
    async fn test_resubscribing_a_connection_does_not_duplicate_delivery() {
        // Arrange
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let connection = Uuid::new_v4();
        let (tx_old, mut rx_old) = FrameSink::channel(8);
        let (tx_new, mut rx_new) = FrameSink::channel(8);

        // Act
        let old = hub.subscribe(session, connection, tx_old);
        let _new = hub.subscribe(session, connection, tx_new);
        drop(old);
        hub.publish(session, numbered(7));

        // Assert
        assert_eq!(hub.subscriber_count(session).await, 1);
        assert!(rx_old.drain().is_empty());
        assert_eq!(values(&rx_new.drain()), vec![7]);
    }

    #[tokio::test]
    async fn test_closed_subscriber_does_not_block_others() {
        // Arrange
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx_dead, rx_dead) = FrameSink::channel(8);
        let (tx_live, mut rx_live) = FrameSink::channel(8);
        let _dead = hub.subscribe(session, Uuid::new_v4(), tx_dead);
        let _live = hub.subscribe(session, Uuid::new_v4(), tx_live);
        drop(rx_dead);

        // Act
        hub.publish(session, numbered(1));
        hub.publish(session, numbered(2));

        // Assert
        assert_eq!(hub.subscriber_count(session).await, 1);
        assert_eq!(values(&rx_live.drain()), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_evicted_and_closed() {
        // Arrange
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx, mut rx) = FrameSink::channel(1);
        let _sub = hub.subscribe(session, Uuid::new_v4(), tx);

        // Act
        hub.publish(session, numbered(1));
        hub.publish(session, numbered(2));
        hub.publish(session, numbered(3));

        // Assert
        assert_eq!(hub.subscriber_count(session).await, 0);
        assert_eq!(values(&rx.take(1).await), vec![1]);
        assert!(rx.is_closed().await);
    }

    #[tokio::test]
    async fn test_greeting_precedes_later_frames() {
        // Arrange
        let (hub, _task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx_early, mut rx_early) = FrameSink::channel(8);
        let (tx_late, mut rx_late) = FrameSink::channel(8);
        let _early = hub.subscribe(session, Uuid::new_v4(), tx_early);

        // Act
        hub.publish(session, numbered(1));
        let _late = hub.subscribe_with_greeting(
            session,
            Uuid::new_v4(),
            tx_late,
            Frame::full_overwrite(json!({ "snapshot": true })),
        );
        hub.publish(session, numbered(2));
        let _ = hub.subscriber_count(session).await;

        // Assert
        assert_eq!(values(&rx_early.drain()), vec![1, 2]);
        let late = rx_late.drain();
        assert_eq!(late.len(), 2);
        assert_eq!(late[0]["method"], "full_overwrite");
        assert_eq!(late[1]["value"], 2);
    }

    #[tokio::test]
    async fn test_shutdown_drains_queued_requests_then_closes_outboxes() {
        // Arrange
        let (hub, task) = Hub::spawn();
        let session = Uuid::new_v4();
        let (tx, mut rx) = FrameSink::channel(8);
        let sub = hub.subscribe(session, Uuid::new_v4(), tx);

        // Act
        hub.publish(session, numbered(1));
        hub.shutdown();
        task.await.unwrap();
        hub.publish(session, numbered(2));

        // Assert
        assert_eq!(values(&rx.take(1).await), vec![1]);
        assert!(rx.is_closed().await);
        assert_eq!(hub.subscriber_count(session).await, 0);
        drop(sub);
    }
}
