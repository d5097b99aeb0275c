mod config;
mod fetch;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use agenda_core::adapters::SourcePage;
use agenda_core::aggregate::aggregate;
use agenda_core::ics::generate_ics;
use agenda_core::resolve::{resolve_candidates, ResolveOptions};
use agenda_core::{AgendaError, AgendaResult, ResolvedEvent};
use config::SourceConfig;

#[derive(Parser)]
#[command(name = "agenda-cli")]
#[command(about = "Aggregate cultural event listings from venue websites into one iCalendar feed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured source and write the .ics file
    Generate {
        /// Config file (defaults to ./agenda.toml, then ~/.config/agenda/agenda.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Retention horizon in days (overrides the config)
        #[arg(long)]
        days: Option<i64>,
    },
    /// List the configured sources
    Sources {
        /// Config file (defaults to ./agenda.toml, then ~/.config/agenda/agenda.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            output,
            days,
        } => cmd_generate(config, output, days).await,
        Commands::Sources { config } => cmd_sources(config),
    }
}

async fn cmd_generate(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    days: Option<i64>,
) -> Result<()> {
    let cfg = config::load_config(config_path.as_deref())?;
    let timezone = cfg.timezone()?;
    let opts = cfg.resolve_options()?;
    let horizon_days = days.unwrap_or(cfg.horizon_days);
    let default_duration = cfg.default_duration()?;

    // Captured once so the retention window is identical for every
    // source, however long the run takes.
    let reference = Utc::now().with_timezone(&timezone);

    let client = fetch::client()?;
    let mut per_source: Vec<Vec<ResolvedEvent>> = Vec::with_capacity(cfg.sources.len());

    for source in &cfg.sources {
        println!("📅 {}", source.name);

        // Any per-source failure means zero events from that source;
        // the remaining sources still run.
        let events = match process_source(
            &client,
            source,
            reference,
            horizon_days,
            default_duration,
            &opts,
        )
        .await
        {
            Ok(events) => {
                println!("  {} events within {} days", events.len(), horizon_days);
                events
            }
            Err(e) => {
                eprintln!("  skipped: {e:#}");
                Vec::new()
            }
        };
        per_source.push(events);
    }

    let document = aggregate(per_source, &cfg.calendar_name, timezone);
    let ics = generate_ics(&document)?;

    let output = output.unwrap_or_else(|| cfg.output.clone());
    write_output(&output, &ics)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("\nWrote {} with {} events.", output.display(), document.len());
    Ok(())
}

/// Write the emitted document. The only failure class that still
/// aborts a run once the sources have been processed.
fn write_output(path: &Path, ics: &str) -> AgendaResult<()> {
    std::fs::write(path, ics)?;
    Ok(())
}

async fn process_source(
    client: &reqwest::Client,
    source: &SourceConfig,
    reference: DateTime<Tz>,
    horizon_days: i64,
    default_duration: Duration,
    opts: &ResolveOptions,
) -> Result<Vec<ResolvedEvent>> {
    let html = fetch::fetch_page(client, &source.name, &source.url).await?;
    let page = SourcePage {
        url: &source.url,
        location: &source.location,
        html: &html,
    };
    let candidates = source.adapter.adapter().extract(&page);

    Ok(resolve_candidates(
        candidates,
        reference,
        horizon_days,
        default_duration,
        opts,
    ))
}

fn cmd_sources(config_path: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config(config_path.as_deref())?;

    for source in &cfg.sources {
        println!(
            "{}  [{}]\n  {}\n  location: {}",
            source.name,
            source.adapter.as_str(),
            source.url,
            source.location
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_output_surfaces_io_failures() {
        let err = write_output(
            Path::new("/nonexistent-agenda-dir/out.ics"),
            "BEGIN:VCALENDAR",
        )
        .unwrap_err();

        assert!(matches!(err, AgendaError::Io(_)));
    }
}
