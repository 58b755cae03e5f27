//! Domain types shared across Painel crates.
//!
//! This crate contains only pure types and calculations with no framework dependencies.
//! Every layer of the API service may use these types; nothing here performs I/O.

pub mod metrics;
pub mod money;
pub mod period;
pub mod sale;
pub mod user;
