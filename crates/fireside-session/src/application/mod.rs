//! Session operations and their collaborators.

pub mod context;
mod enrichment;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod fixtures;
