//! services/web/src/admin.rs
//!
//! Administrative schema operations behind the `dbtool` CLI. Each returns
//! the confirmation line the CLI prints, so the commands and their tests
//! share one implementation.

use sqlx::SqlitePool;

use crate::adapters::db::DbAdapter;
use crate::error::AppError;

const TABLES: [&str; 4] = ["chats", "auth_sessions", "users", "_sqlx_migrations"];

/// Creates the schema by running all migrations.
pub async fn init_db(pool: &SqlitePool) -> Result<&'static str, AppError> {
    DbAdapter::new(pool.clone()).run_migrations().await?;
    Ok("Your database has been created.")
}

/// Drops every application table, including the migrations ledger.
pub async fn drop_tables(pool: &SqlitePool) -> Result<&'static str, AppError> {
    for table in TABLES {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(pool)
            .await?;
    }
    Ok("All tables have been dropped.")
}

/// Deletes every row while keeping the schema in place.
pub async fn clear_db(pool: &SqlitePool) -> Result<&'static str, AppError> {
    // Children before parents, to stay compatible with enforced foreign keys.
    for table in ["chats", "auth_sessions", "users"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(pool)
            .await?;
    }
    Ok("The DB has been cleared.")
}

/// Drops and recreates all tables. Development use only.
pub async fn reset_db(pool: &SqlitePool) -> Result<&'static str, AppError> {
    drop_tables(pool).await?;
    DbAdapter::new(pool.clone()).run_migrations().await?;
    Ok("Database dropped and re-created.")
}
