use chrono::Utc;
use clap::{Parser, Subcommand};
use match_feed::format::{format_kickoff, group_by_league, match_line};
use match_feed::status::classify_match;
use match_feed::{FeedConfig, FeedScheduler, FeedSource};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "match-feed")]
#[command(about = "Fixtures for your tracked teams, with same-day notifications")]
#[command(version = "0.1.0")]
struct Cli {
    /// Optional configuration file (TOML/YAML/JSON); env vars override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the feed grouped by league
    Show,

    /// Run one notification pass for today's matches
    Notify,

    /// Refresh and notify on a fixed interval
    Watch {
        /// Override the refresh interval in minutes
        #[arg(short, long)]
        refresh_minutes: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = FeedConfig::load(cli.config.as_deref())?;
    info!("Tracking {} entries", config.tracked.len());

    match cli.command {
        Commands::Show => {
            let scheduler = FeedScheduler::new(config.clone()).await?;
            let read = scheduler.feed(Utc::now()).await;

            match read.source {
                FeedSource::Unavailable => warn!("Could not fetch any fixtures"),
                FeedSource::StaleFallback => warn!("Showing stale results from {}", read.entry.computed_at_utc),
                _ => {}
            }

            if read.feed().is_empty() {
                println!("No matches found for the selected leagues or teams.");
                return Ok(());
            }

            let offset = config.local_offset();
            let local_now = Utc::now().with_timezone(&offset);
            for (league, matches) in group_by_league(read.feed()) {
                println!("\n{}", if league.is_empty() { "Other" } else { league.as_str() });
                for m in &matches {
                    println!(
                        "  [{:<11}] {:<48} {}",
                        classify_match(m, local_now),
                        match_line(m),
                        format_kickoff(m.kickoff_utc, offset)
                    );
                }
            }
        }
        Commands::Notify => {
            let scheduler = FeedScheduler::new(config).await?;
            let report = scheduler.run_once(Utc::now()).await;
            if let Some(notifications) = report.notifications {
                info!(
                    "Sent {}, already notified {}, failed {}",
                    notifications.sent.len(),
                    notifications.already_notified,
                    notifications.failed
                );
            } else {
                info!("Notifications are disabled");
            }
        }
        Commands::Watch { refresh_minutes } => {
            if let Some(minutes) = refresh_minutes {
                config.scheduler.refresh_minutes = minutes;
                config.validate()?;
            }

            let scheduler = FeedScheduler::new(config).await?;
            if let Err(e) = scheduler.start().await {
                error!("Scheduler failed: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}
