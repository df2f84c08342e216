//! Operator tool for inspecting rate limit windows.
//!
//! Reads the same environment as the server, so `show` looks at exactly the
//! keys the running limiter uses. It never writes to the store.
//!
//! # Usage
//!
//! ```bash
//! # Check the counter store connection
//! cargo run --bin ratectl -- ping
//!
//! # Show the current window for a client
//! cargo run --bin ratectl -- show 203.0.113.7
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` or `REDIS_HOST` (required): counter store connection
//! - `RATE_LIMIT_MAX_REQUESTS`, `RATE_LIMIT_KEY_PREFIX`: same meaning as for the server

use httprate::config::{self, Config, mask_connection_string};
use httprate::domain::WindowKey;
use httprate::infrastructure::store::{CounterStore, RedisStore};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for inspecting httprate counters.
#[derive(Parser)]
#[command(name = "ratectl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the counter store connection
    Ping,

    /// Show the current window for a client identity
    Show {
        /// Client identity exactly as the proxy sends it (e.g. "203.0.113.7")
        identity: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let store = connect(&config).await?;

    match cli.command {
        Commands::Ping => ping(&store).await?,
        Commands::Show { identity } => show(&store, &config, &identity).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<RedisStore> {
    let redis_url = config
        .redis_url
        .as_deref()
        .context("REDIS_URL or REDIS_HOST must be set")?;

    println!(
        "{} {}",
        "Store:".bright_black(),
        mask_connection_string(redis_url)
    );

    RedisStore::connect(redis_url)
        .await
        .context("Failed to connect to Redis")
}

async fn ping(store: &impl CounterStore) -> Result<()> {
    if !store.health_check().await {
        println!("{}", "✗ Counter store did not answer PING".red());
        anyhow::bail!("Counter store unreachable");
    }

    println!("{}", "✓ Counter store reachable".green());
    Ok(())
}

/// Prints count, limit and remaining TTL for one client's window.
async fn show(store: &RedisStore, config: &Config, identity: &str) -> Result<()> {
    let key = WindowKey::new(&config.key_prefix, identity);
    let snapshot = store
        .inspect(key.as_str())
        .await
        .with_context(|| format!("Failed to read {}", key))?;

    println!("{} {}", "Key:".bright_black(), key.to_string().bold());

    let Some(snapshot) = snapshot else {
        println!("{}", "No open window (next request starts one)".cyan());
        return Ok(());
    };

    let usage = format!("{}/{}", snapshot.count, config.max_requests);
    if snapshot.count >= config.max_requests {
        println!("{} {} {}", "Count:".bright_black(), usage.red().bold(), "(limited)".red());
    } else {
        println!("{} {}", "Count:".bright_black(), usage.green());
    }

    match snapshot.ttl {
        Some(ttl) => println!(
            "{} {:.1}s",
            "Window closes in:".bright_black(),
            ttl.as_secs_f64()
        ),
        None => println!(
            "{}",
            "⚠️  Window has no TTL and will never close on its own".yellow()
        ),
    }

    Ok(())
}
