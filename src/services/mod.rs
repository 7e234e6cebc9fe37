// src/services/mod.rs
//
// Clients for the managed services the app sits on top of

pub mod assistant;
pub mod firebase;
pub mod monitoring;

pub use assistant::{AssistantError, AssistantService};
pub use firebase::{FirebaseIdentityProvider, IdentityError, IdentityProvider, VerifiedIdentity};
