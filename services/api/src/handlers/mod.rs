pub mod auth;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod product;
pub mod sale;
pub mod user;
