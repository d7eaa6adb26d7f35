//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod auth;
pub mod entities;
pub mod error;

pub use auth::{Authority, KeyWeight, PermissionLevel, PermissionLevelWeight, WaitWeight};
pub use entities::*;
pub use error::DomainError;
