mod helpers;

mod auth_test;
mod dashboard_test;
mod sale_test;
mod user_test;
