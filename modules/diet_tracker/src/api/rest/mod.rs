pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod problem;
pub mod request_id;
pub mod routes;
pub mod session;
