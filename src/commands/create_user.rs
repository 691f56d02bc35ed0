//! Create-user command - Inserts a user record directly.
//!
//! Accounts are otherwise provisioned by the identity provider; this is how
//! an operator seeds the first admin.

use crate::cli::args::CreateUserArgs;
use crate::config::Config;
use crate::domain::NewUser;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the create-user command
pub async fn execute(args: CreateUserArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);

    let user = services
        .users()
        .create_user(NewUser::new(args.name, args.email.trim(), args.role))
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User created");
    println!("Created user {} <{}> with id {}", user.name, user.email, user.id);

    Ok(())
}
