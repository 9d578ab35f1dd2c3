//! Credit and debit commands - balance adjustments

use anyhow::Result;
use uuid::Uuid;

use super::{account::print_account, get_context, get_logger, log_event};
use crate::output;

pub fn run_credit(account_id: Uuid, amount: i64, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(
        &logger,
        graphene_core::LogEvent::new("command_executed").with_command("credit"),
    );

    let ctx = get_context()?;
    let account = match ctx.account_store.credit(account_id, amount) {
        Ok(account) => account,
        Err(e) => {
            log_event(
                &logger,
                graphene_core::LogEvent::new("credit_failed").with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    output::success(&format!("Credited {} tokens", amount));
    print_account(&account);
    Ok(())
}

pub fn run_debit(account_id: Uuid, amount: i64, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(
        &logger,
        graphene_core::LogEvent::new("command_executed").with_command("debit"),
    );

    let ctx = get_context()?;
    let account = match ctx.account_store.debit(account_id, amount) {
        Ok(account) => account,
        Err(e) => {
            log_event(
                &logger,
                graphene_core::LogEvent::new("debit_failed").with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    output::success(&format!("Debited {} tokens", amount));
    print_account(&account);
    Ok(())
}
