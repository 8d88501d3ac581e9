use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{AccountController, HttpAccountService, StatusLevel};
use shared::domain::{AccountField, AccountId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "accounts", about = "Manage bank accounts on the account service")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the configured accounts collection URL.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every account.
    List,
    Create {
        #[arg(long)]
        balance: String,
        /// Creation date, YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// COURANT or EPARGNE.
        #[arg(long = "type", default_value = "COURANT")]
        account_type: String,
    },
    Update {
        id: String,
        #[arg(long)]
        balance: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long = "type")]
        account_type: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let api_url = settings.api_url()?;
    info!(%api_url, "using account service");

    let service = HttpAccountService::with_timeout(api_url, settings.request_timeout())?;
    let controller = AccountController::new(Arc::new(service));
    controller
        .load()
        .await
        .context("could not load accounts")?;

    match args.command {
        Command::List => {}
        Command::Create {
            balance,
            date,
            account_type,
        } => {
            controller.edit_field(AccountField::Balance, &balance)?;
            controller.edit_field(AccountField::CreationDate, &date)?;
            controller.edit_field(AccountField::AccountType, &account_type)?;
            submit(&controller).await?;
        }
        Command::Update {
            id,
            balance,
            date,
            account_type,
        } => {
            controller.select_account(&AccountId::new(id))?;
            let edits = [
                (AccountField::Balance, balance),
                (AccountField::CreationDate, date),
                (AccountField::AccountType, account_type),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    controller.edit_field(field, &value)?;
                }
            }
            submit(&controller).await?;
        }
        Command::Delete { id } => {
            let result = controller.delete_record(&AccountId::new(id)).await;
            print_status(&controller);
            result?;
        }
    }

    print_accounts(&controller);
    Ok(())
}

async fn submit(controller: &AccountController) -> Result<()> {
    let label = controller.submit_label();
    let result = controller.submit().await;
    print_status(controller);
    result.with_context(|| format!("{label} failed"))?;
    Ok(())
}

fn print_status(controller: &AccountController) {
    if let Some(status) = controller.status() {
        match status.level {
            StatusLevel::Success => println!("{}", status.text),
            StatusLevel::Error => eprintln!("error: {}", status.text),
        }
    }
}

fn print_accounts(controller: &AccountController) {
    println!(
        "{:<12} {:>14} {:<12} {:<8}",
        "ID", "BALANCE", "CREATED", "TYPE"
    );
    for account in controller.accounts() {
        println!(
            "{:<12} {:>14} {:<12} {:<8}",
            account.id.to_string(),
            account.balance.to_string(),
            account.creation_date.to_string(),
            account.account_type.to_string()
        );
    }
}
