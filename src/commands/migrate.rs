//! Migrate command - Manages the `users` table schema.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn failed(step: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| AppError::internal(format!("{} failed: {}", step, e))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Migrations are applied explicitly here, not on connect
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(failed("Database connection"))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(failed("Migration"))?;
            tracing::info!("users schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(failed("Rollback"))?;
            tracing::info!("Rolled back the last users migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await.map_err(failed("Status check"))?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in &status {
                println!("[{}] {}", if *applied { "x" } else { " " }, name);
            }
            println!("{} applied, {} pending", status.len() - pending, pending);
        }
        MigrateAction::Fresh { yes } => {
            if !yes {
                return Err(AppError::bad_request(
                    "fresh drops the users table and every account in it; pass --yes to confirm",
                ));
            }
            tracing::warn!("Dropping users table and re-running all migrations");
            db.fresh_migrations().await.map_err(failed("Fresh migration"))?;
        }
    }

    Ok(())
}
