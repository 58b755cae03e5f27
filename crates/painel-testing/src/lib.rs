//! Test utilities for Painel services.
//!
//! Provides `MockAuth` bearer identities and an in-memory SQLite connection.
//! Import in tests only.

pub mod auth;
pub mod db;
