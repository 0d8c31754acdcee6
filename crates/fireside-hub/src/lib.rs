//! Fireside: broadcast hub.
//!
//! A single actor owns every session's subscriber set. Subscribe,
//! unsubscribe and publish requests travel through one ordered queue, so
//! all subscribers of a session observe that session's frames in the same
//! order, and a publish reaches exactly the subscribers registered when it
//! was enqueued.

pub mod frame;
pub mod hub;

pub use frame::Frame;
pub use hub::{Hub, Outbox, Subscription};
