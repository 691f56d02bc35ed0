//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::domain::Role;

/// User Directory - user management API with role-based visibility
#[derive(Parser, Debug)]
#[command(name = "user-directory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create a user record
    CreateUser(CreateUserArgs),
}

/// Arguments for the serve command
///
/// Unset values fall back to `SERVER_HOST` / `SERVER_PORT`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop the users table and re-run all migrations
    Fresh {
        /// Confirm that every stored user will be deleted
        #[arg(long)]
        yes: bool,
    },
}

/// Arguments for the create-user command
#[derive(Parser, Debug)]
pub struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Email address (must be unique)
    #[arg(long)]
    pub email: String,

    /// Role: admin, editor or viewer
    #[arg(long, default_value = "viewer")]
    pub role: Role,
}
