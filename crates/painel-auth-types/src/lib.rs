//! Auth types shared across Painel crates.
//!
//! Provides JWT issuing/validation and the `AuthContext` / `AdminContext` extractors.

pub mod identity;
pub mod token;
