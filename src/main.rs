use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use inbox_triage::config::Config;
use inbox_triage::stats::{FileStatisticsStore, StatisticsAccumulator};
use inbox_triage::store::StatisticsStore;
use inbox_triage::timeparse;

/// Inbox triage utilities: inspect configuration, exercise the time
/// parser, and manage the session statistics tally. The batch scan itself
/// runs inside the hosting orchestration, not from this binary.
#[derive(Parser)]
#[command(name = "inbox-triage", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "triage.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example configuration file with the default policy tables
    InitConfig,
    /// Validate the configuration and print the policy summary
    CheckConfig,
    /// Parse a scheduling-time expression and print the resolved instant
    ParseTime {
        /// Free-form expression, e.g. "tomorrow 2pm" or "friday 9:30am"
        expression: String,
    },
    /// Parse a duration expression and print the resolved length
    ParseDuration {
        /// Free-form expression, e.g. "2 hours" or "45m"
        expression: String,
    },
    /// Print or reset the session statistics tally
    Stats {
        /// Reset the tally instead of printing it
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig => {
            Config::create_example(&cli.config).await?;
            println!("Wrote example configuration to {}", cli.config.display());
        }
        Commands::CheckConfig => {
            let config = Config::load(&cli.config).await?;
            config.validate()?;
            let policy = config.policy_set();
            println!("Configuration OK");
            println!("  categories: {}", policy.category_keys().count());
            println!("  spam keys:  {}", policy.spam_keys().join(", "));
        }
        Commands::ParseTime { expression } => {
            let now = Utc::now();
            let resolved = timeparse::parse_scheduled_time(&expression, now);
            println!("{}", resolved.to_rfc3339());
        }
        Commands::ParseDuration { expression } => {
            let duration = timeparse::parse_duration(Some(&expression));
            println!("{} minutes", duration.num_minutes());
        }
        Commands::Stats { clear } => {
            let config = Config::load(&cli.config).await?;
            let store = FileStatisticsStore::new(&config.statistics.path);
            if clear {
                let mut acc = StatisticsAccumulator::load(Box::new(store)).await?;
                acc.clear().await?;
                println!("Statistics cleared");
            } else {
                let stats = store.load().await?;
                println!("Processed: {}", stats.processed);
                let mut categories: Vec<_> = stats.by_category.iter().collect();
                categories.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
                for (name, count) in categories {
                    println!("  {:30} {}", name, count);
                }
                let mut quadrants: Vec<_> = stats.by_priority.iter().collect();
                quadrants.sort_by(|a, b| a.0.cmp(b.0));
                for (name, count) in quadrants {
                    println!("  {:30} {}", name, count);
                }
            }
        }
    }

    Ok(())
}
