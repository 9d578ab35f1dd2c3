//! Logs command - view application logs

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;

use super::get_graphene_dir;
use crate::output;
use graphene_core::{EntryPoint, LoggingService};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List { limit, errors, json } => list(limit, errors, json),
        LogsCommands::Stats { json } => stats(json),
    }
}

fn open_logs() -> Result<LoggingService> {
    let graphene_dir = get_graphene_dir();
    std::fs::create_dir_all(&graphene_dir)?;
    Ok(LoggingService::new(
        &graphene_dir,
        EntryPoint::Cli,
        env!("CARGO_PKG_VERSION"),
    )?)
}

fn render_time(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

fn list(limit: usize, errors_only: bool, json: bool) -> Result<()> {
    let logs = open_logs()?;
    let entries = if errors_only {
        logs.get_errors(limit)?
    } else {
        logs.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Source", "Event", "Command", "Detail"]);
    for entry in entries {
        // Failed events stand out; their message goes in the detail column
        let event = if entry.error_message.is_some() {
            entry.event.red().to_string()
        } else {
            entry.event
        };
        table.add_row(vec![
            render_time(entry.timestamp),
            entry.entry_point,
            event,
            entry.command.unwrap_or_default(),
            entry.error_message.unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn stats(json: bool) -> Result<()> {
    let logs = open_logs()?;
    let total = logs.count()?;
    let error_count = logs.get_errors(1000)?.len();
    let db_path = logs.db_path().to_path_buf();
    let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "total_entries": total,
                "error_count": error_count,
                "database_path": db_path.to_string_lossy(),
                "database_size_bytes": size_bytes,
            })
        );
        return Ok(());
    }

    println!("{}", "Log Statistics".bold());
    let mut table = output::create_table();
    table.add_row(vec!["Entries", &total.to_string()]);
    table.add_row(vec!["Errors", &error_count.to_string()]);
    table.add_row(vec!["Database", &db_path.display().to_string()]);
    table.add_row(vec!["Size", &output::format_size(size_bytes)]);
    println!("{}", table);

    Ok(())
}
