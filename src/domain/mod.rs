//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod role;
pub mod user;

pub use role::Role;
pub use user::{normalize_name, NewUser, UpdateUser, User, UserChanges, UserSummary};
