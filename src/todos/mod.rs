//! # Todos Module
//!
//! Per-user todo lists:
//! - Listing (newest first, optional limit)
//! - Creation with title validation
//! - Partial updates and deletion through the owner filter

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::todos_routes;
