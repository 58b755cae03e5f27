//! sea-orm entities for the Painel API database.

pub mod products;
pub mod sale_items;
pub mod sales;
pub mod users;
