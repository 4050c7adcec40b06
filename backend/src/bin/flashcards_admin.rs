//! Administrative commands for a flashcards deployment.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use flashcards::domain::{AccountService, DemoDataWipeService, Username};
use flashcards::outbound::persistence::{
    DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_ENV: &str = "FLASHCARDS_DATABASE_URL";

/// `flashcards-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "flashcards-admin",
    about = "Maintenance commands for the flashcards backend",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `FLASHCARDS_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Delete every non-privileged account with its decks and flashcards.
    Wipe,
    /// Create a privileged account that survives wipes.
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init();

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    run_pending_migrations(&database_url).await?;
    let pool = DbPool::new(PoolConfig::new(&database_url)).await?;
    let accounts = Arc::new(DieselAccountRepository::new(pool));

    match args.command {
        Command::Wipe => {
            let summary = DemoDataWipeService::new(accounts).wipe().await?;
            println!("Deleted {} objects.", summary.total());
            println!("Successfully wiped demo data.");
        }
        Command::CreateSuperuser { username, password } => {
            let username = Username::new(username).wrap_err("invalid username")?;
            let user = AccountService::new(accounts, Arc::new(DefaultClock))
                .provision_privileged(username, &password)
                .await?;
            println!("Created superuser {} ({}).", user.username(), user.id());
        }
    }
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    match from_env {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(eyre!("{DATABASE_URL_ENV} must not be empty")),
        None => Err(eyre!(
            "database URL missing: set --database-url or {DATABASE_URL_ENV}"
        )),
    }
}
