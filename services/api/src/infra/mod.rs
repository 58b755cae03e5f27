pub mod db;
pub mod oauth;
pub mod password;
