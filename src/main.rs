//! `pharmacy-orders` admin command line.
//!
//! # Usage
//!
//! ```text
//! pharmacy-orders init-db
//! pharmacy-orders import-medicines catalogue.csv --updated-by inventory
//! pharmacy-orders medicines
//! pharmacy-orders orders --user-id 7
//! pharmacy-orders orders --admin
//! ```

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use pharmacy_orders::{
    auth::Caller,
    config::{database, settings},
    core::{company, import, medicine, order},
    errors::Result,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pharmacy-orders", about = "Administer the pharmacy ordering database")]
struct Args {
    /// Database URL, overriding `DATABASE_URL` and the settings file.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create any missing tables.
    InitDb,
    /// Import medicines from a CSV file (name,description,company).
    ImportMedicines {
        /// CSV file with a header row.
        file: PathBuf,
        /// Name recorded as `updated_by`; defaults to the configured operator.
        #[arg(long)]
        updated_by: Option<String>,
    },
    /// Print all companies as JSON.
    Companies,
    /// Print medicines grouped by company as JSON.
    Medicines,
    /// Print orders as JSON.
    Orders {
        /// Show only this user's orders.
        #[arg(long, default_value_t = 0)]
        user_id: i64,
        /// Show every order with owner details.
        #[arg(long)]
        admin: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .inspect_err(|e| error!("Failed to encode output: {}", e))?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let args = Args::parse();

    // 3. Load settings, letting the command line win over file and environment
    let mut app_settings = settings::load_settings()
        .inspect_err(|e| error!("Critical error loading settings: {}", e))?;
    if let Some(url) = args.database_url {
        app_settings.database_url = url;
    }

    // 4. Connect and make sure the schema exists
    let db = database::create_connection(&app_settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    match args.command {
        Command::InitDb => Ok(()),
        Command::ImportMedicines { file, updated_by } => {
            let updated_by = updated_by.unwrap_or(app_settings.operator);
            let summary = import::import_medicines(&db, &file, &updated_by).await?;
            print_json(&summary)
        }
        Command::Companies => print_json(&company::get_all_companies(&db).await?),
        Command::Medicines => print_json(&medicine::get_all_medicines(&db).await?),
        Command::Orders { user_id, admin } => {
            let caller = Caller {
                user_id,
                is_admin: admin,
            };
            print_json(&order::get_all_orders(&db, caller).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmacy_orders::errors::Error;
    use std::collections::HashMap;

    #[test]
    fn test_print_json_reports_encoding_failure_as_json_error() {
        let mut by_pair = HashMap::new();
        by_pair.insert((1, 2), "not a string key");

        assert!(matches!(print_json(&by_pair), Err(Error::Json(_))));
    }

    #[test]
    fn test_print_json_accepts_plain_values() {
        assert!(print_json(&vec!["Acme", "Globex"]).is_ok());
    }
}
