//! Excel → MySQL import pipeline
//!
//! One linear run: load config, connect, create the destination table from
//! the spreadsheet headers, insert every row, close the connection. Every
//! failure is terminal for the run; nothing is retried.

mod config;
mod db;
mod sheet;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info, warn};
use sqlx::{Connection, MySqlConnection};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "excel2mysql",
    about = "Import an Excel spreadsheet into a MySQL table created from its headers",
    version
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

/// One timestamped log file per run, info level unless RUST_LOG says
/// otherwise. Errors are additionally printed for the operator.
fn init_logging() -> Result<()> {
    let log_file = format!("excel2mysql_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file: {log_file}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    if !cli.config.exists() {
        if let Err(e) = Config::write_template(&cli.config) {
            error!("{e:#}");
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
        info!("Created default config file: {}", cli.config.display());
        println!("Created default config file: {}", cli.config.display());
        println!("Please update the config file with your database credentials and try again.");
        return ExitCode::FAILURE;
    }

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    println!("Starting Excel to MySQL data transfer...");
    info!("Starting Excel to MySQL data transfer");

    if run(&config).await {
        println!("Data transfer completed successfully!");
        info!("Data transfer completed successfully");
        ExitCode::SUCCESS
    } else {
        println!("Data transfer failed. Check the log file for details.");
        error!("Data transfer failed");
        ExitCode::FAILURE
    }
}

/// Owns the connection for the whole run and closes it on every exit path.
async fn run(config: &Config) -> bool {
    let Some(mut conn) = db::connect(&config.database).await else {
        return false;
    };

    let result = import(&mut conn, config).await;

    if let Err(e) = conn.close().await {
        warn!("Error closing database connection: {e}");
    } else {
        info!("Database connection closed");
    }

    match result {
        Ok(records) => {
            println!(
                "Successfully inserted {records} records into {}",
                config.database.table
            );
            true
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            false
        }
    }
}

async fn import(conn: &mut MySqlConnection, config: &Config) -> Result<u64> {
    let (dataset, columns) = db::schema::ensure_table(
        conn,
        Path::new(&config.files.excel_file),
        &config.database.table,
    )
    .await?;

    db::insert::insert_all(conn, &dataset, &columns, &config.database.table).await
}
