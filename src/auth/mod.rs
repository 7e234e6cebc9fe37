//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Firebase ID token exchange for session cookies
//! - Session cookie verification and revocation
//! - The session gate that protects every non-public route
//! - AuthedUser extractor for protected handlers

pub mod extractors;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;


pub use extractors::AuthedUser;
pub use gate::session_gate;
pub use routes::auth_routes;
