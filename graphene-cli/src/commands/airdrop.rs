//! Airdrop command - distribute tokens through a transfer provider

use std::sync::Arc;

use anyhow::{bail, Result};
use graphene_core::adapters::mock_transfer::MockTransferProvider;
use graphene_core::services::DistributionService;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(external_id: &str, wallet: &str, amount: i64, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(
        &logger,
        graphene_core::LogEvent::new("command_executed").with_command("airdrop"),
    );

    let ctx = get_context()?;

    // Only the simulated provider is wired up from the CLI; live transfers
    // go through the bot. Demo mode keeps that explicit.
    if !ctx.config.demo_mode {
        bail!("airdrop requires demo mode (set GRAPHENE_DEMO_MODE=true to simulate transfers)");
    }

    let distribution = DistributionService::new(
        Arc::clone(&ctx.account_store),
        Arc::new(MockTransferProvider::new()),
    );

    let result = match distribution.airdrop(external_id, wallet, amount) {
        Ok(result) => result,
        Err(e) => {
            log_event(
                &logger,
                graphene_core::LogEvent::new("airdrop_failed").with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    output::success(&format!(
        "Airdropped {} tokens via {} (signature {})",
        result.amount, result.provider, result.signature
    ));
    println!("Account {} balance: {}", result.account_id, result.new_balance);
    Ok(())
}
