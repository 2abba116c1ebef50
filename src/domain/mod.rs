//! Domain entities of the back-office: clients, their requests and the
//! identity records used to authorize staff.

pub mod auth;
pub mod client;
pub mod client_request;
pub mod request_type;
pub mod types;
pub mod user;
