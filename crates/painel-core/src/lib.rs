//! HTTP plumbing shared by Painel services: error envelope, health, request ids, tracing.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
