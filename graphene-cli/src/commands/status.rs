//! Status command - show store status and summary

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    super::log_event(
        &logger,
        graphene_core::LogEvent::new("command_executed").with_command("status"),
    );

    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Graphene Store Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Database", &status.db_path]);
    table.add_row(vec!["Size", &output::format_size(status.db_size_bytes)]);
    table.add_row(vec!["Key source", &status.key_source]);
    table.add_row(vec!["Locales", &status.supported_locales.join(", ")]);

    println!("{}", table);

    if ctx.config.demo_mode {
        println!();
        output::warning("Demo mode is enabled (using demo.duckdb)");
    }

    Ok(())
}
