//! services/web/src/bin/dbtool.rs
//!
//! Administrative CLI for the chat database schema.

use clap::{Parser, Subcommand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use web_lib::{admin, error::AppError};

/// dbtool - database schema administration
#[derive(Parser, Debug)]
#[command(name = "dbtool")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database URL (falls back to the DATABASE_URL environment variable)
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database schema from the migrations
    InitDb,
    /// Drop all tables
    DropTables,
    /// Delete all rows, keeping the schema
    ClearDb,
    /// Drop and recreate all tables (dev use only)
    ResetDb,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let database_url = match cli.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").map_err(|_| {
            AppError::Internal("DATABASE_URL is not set and --database-url was not given".into())
        })?,
    };

    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let confirmation = match cli.command {
        Commands::InitDb => admin::init_db(&pool).await?,
        Commands::DropTables => admin::drop_tables(&pool).await?,
        Commands::ClearDb => admin::clear_db(&pool).await?,
        Commands::ResetDb => admin::reset_db(&pool).await?,
    };
    println!("{confirmation}");

    Ok(())
}
