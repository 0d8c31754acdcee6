//! Fireside Core: shared abstractions.
//!
//! This crate defines the seams every other crate depends on: time,
//! randomness, the domain error type, and the two external collaborators
//! (narration and speech synthesis). It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod narrator;
pub mod rng;
pub mod speech;
