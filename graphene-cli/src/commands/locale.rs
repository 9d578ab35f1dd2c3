//! Locale command - update an account's locale

use anyhow::Result;
use uuid::Uuid;

use super::{account::print_account, get_context, get_logger, log_event};
use crate::output;

pub fn run(account_id: Uuid, locale: &str, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(
        &logger,
        graphene_core::LogEvent::new("command_executed").with_command("locale"),
    );

    let ctx = get_context()?;
    let account = ctx.account_store.set_locale(account_id, locale)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    output::success(&format!("Locale set to {}", account.locale));
    print_account(&account);
    Ok(())
}
