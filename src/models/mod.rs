//! Database models backing the back-office repository.

pub mod client;
pub mod client_request;
pub mod config;
pub mod request_type;
pub mod user;
