//! Account command - get-or-create and display an account

use anyhow::Result;
use graphene_core::Account;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(external_id: &str, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(
        &logger,
        graphene_core::LogEvent::new("command_executed").with_command("account"),
    );

    let ctx = get_context()?;
    let before = ctx.account_store.count()?;
    let account = ctx.account_store.get_or_create(external_id)?;
    let created = ctx.account_store.count()? > before;

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    if created {
        output::success("Created new account");
    }
    print_account(&account);

    Ok(())
}

pub fn print_account(account: &Account) {
    let mut table = output::create_table();
    table.add_row(vec!["Account id", &account.id.to_string()]);
    table.add_row(vec!["External id", &account.external_id]);
    table.add_row(vec!["Locale", &account.locale]);
    table.add_row(vec!["Balance", &account.balance.to_string()]);
    table.add_row(vec!["Created", &account.created_at.to_rfc3339()]);
    table.add_row(vec!["Updated", &account.updated_at.to_rfc3339()]);
    println!("{}", table);
}
