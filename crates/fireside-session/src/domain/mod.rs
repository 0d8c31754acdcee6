//! Session data and its wire shape.

pub mod player;
pub mod state;
