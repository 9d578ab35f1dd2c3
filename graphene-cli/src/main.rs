//! Graphene CLI - admin tool for the encrypted account store

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;
mod output;

use commands::{account, airdrop, balance, info, key, locale, logs, status};

/// Graphene - encrypted token account store
#[derive(Parser)]
#[command(name = "graphene", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show store status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch an account by external id, creating it on first sight
    Account {
        /// External identifier (e.g. a Telegram user id)
        external_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Credit tokens to an account
    Credit {
        /// Account id
        account_id: Uuid,
        /// Amount of tokens to credit
        amount: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Debit tokens from an account
    Debit {
        /// Account id
        account_id: Uuid,
        /// Amount of tokens to debit
        amount: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update an account's locale
    Locale {
        /// Account id
        account_id: Uuid,
        /// Locale tag (en, ru, es, zh)
        locale: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a token airdrop through the configured transfer provider
    Airdrop {
        /// External identifier of the recipient
        external_id: String,
        /// Recipient wallet address
        wallet: String,
        /// Amount of tokens to distribute
        amount: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how the master key is resolved
    Key {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show project info and links
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Account { external_id, json } => account::run(&external_id, json),
        Commands::Credit { account_id, amount, json } => {
            balance::run_credit(account_id, amount, json)
        }
        Commands::Debit { account_id, amount, json } => {
            balance::run_debit(account_id, amount, json)
        }
        Commands::Locale { account_id, locale, json } => locale::run(account_id, &locale, json),
        Commands::Airdrop { external_id, wallet, amount, json } => {
            airdrop::run(&external_id, &wallet, amount, json)
        }
        Commands::Key { json } => key::run(json),
        Commands::Logs { command } => logs::run(command),
        Commands::Info { json } => info::run(json),
    }
}
