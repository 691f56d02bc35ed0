//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `create-user` - Insert a user record (e.g. the first admin)

pub mod args;

pub use args::{Cli, Commands};
