//! # Chat Module
//!
//! Proxies student questions to the external question-answering service.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::chat_routes;
