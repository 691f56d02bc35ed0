//! User Directory - user management API with role-based visibility
//!
//! Admins see and manage every user; editors and viewers only see their own
//! record. Callers are authenticated with HS256 bearer tokens.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities (users, roles)
//! - **services**: Visibility rules and identity verification
//! - **infra**: Database, migrations, repositories, unit of work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Response envelopes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed an admin
//! cargo run -- create-user --name Root --email root@example.com --role admin
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Role, User};
pub use errors::{AppError, AppResult};
