//! Almanac service entry point.

use std::sync::Arc;

use almanac::{
    run_server, Config, IngestOutcome, IngestionPipeline, JsonFileStore, RejectReason,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Almanac: calendar event service with natural-language ingestion
#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default behavior)
    Serve {
        /// HTTP port. If not specified, uses the config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
    /// Ingest one natural-language event description
    Add {
        /// Free-form event description, e.g. "Team meeting Thursday at 2pm"
        text: String,
        /// Persist even when the event conflicts with existing ones
        #[arg(long)]
        force: bool,
    },
    /// List all events
    List,
    /// Remove an event by id
    Remove {
        /// Surrogate id or legacy "<start>-<title>" composite
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // For CLI commands (non-serve), use minimal logging
    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);
    if !is_serve {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    match args.command {
        Some(Command::Serve { port, json_logs }) => serve(config, port, json_logs).await,
        Some(Command::Add { text, force }) => add(config, &text, force).await,
        Some(Command::List) => list(config).await,
        Some(Command::Remove { id }) => remove(config, &id).await,
        None => serve(config, None, false).await,
    }
}

/// Run the HTTP server.
async fn serve(mut config: Config, port: Option<u16>, json_logs: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Some(port) = port {
        config.server.http_port = port;
    }

    tracing::info!(
        port = config.server.http_port,
        store = %config.store_path().display(),
        "Starting Almanac v{}",
        env!("CARGO_PKG_VERSION")
    );

    run_server(config).await?;
    Ok(())
}

/// Ingest one event description against the configured store.
async fn add(config: Config, text: &str, force: bool) -> anyhow::Result<()> {
    let store = Arc::new(JsonFileStore::open(config.store_path()).await?);
    let pipeline = IngestionPipeline::new(store);

    match pipeline.ingest(text, force).await? {
        IngestOutcome::Created(event) => {
            println!(
                "Added \"{}\" on {} ({})",
                event.title,
                event.start.format("%Y-%m-%d %H:%M"),
                event.id
            );
        }
        IngestOutcome::Conflict { conflicts, .. } => {
            println!(
                "Time conflict with \"{}\" from {} (use --force to add anyway)",
                conflicts[0].title,
                conflicts[0].start.format("%H:%M")
            );
            std::process::exit(1);
        }
        IngestOutcome::Rejected(RejectReason::InvalidInput) => {
            eprintln!("Invalid input: text is required");
            std::process::exit(1);
        }
        IngestOutcome::Rejected(RejectReason::NoDateFound) => {
            eprintln!(
                "Could not determine a date from your input. \
                 Try being more specific (e.g., 'Team meeting Thursday at 2pm')"
            );
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Print all stored events.
async fn list(config: Config) -> anyhow::Result<()> {
    use almanac::EventStore;

    let store = JsonFileStore::open(config.store_path()).await?;
    let events = store.read_all().await?;

    if events.is_empty() {
        println!("No events");
        return Ok(());
    }
    for event in events {
        let window = match event.end {
            Some(end) => format!(
                "{} - {}",
                event.start.format("%Y-%m-%d %H:%M"),
                end.format("%H:%M")
            ),
            None => event.start.format("%Y-%m-%d %H:%M").to_string(),
        };
        let marker = if event.all_day { " (all day)" } else { "" };
        println!("{}  {}{}  [{}]", window, event.title, marker, event.id);
    }
    Ok(())
}

/// Remove an event by id.
async fn remove(config: Config, id: &str) -> anyhow::Result<()> {
    use almanac::EventStore;

    let store = JsonFileStore::open(config.store_path()).await?;
    let removed = store.delete(id).await?;
    if removed == 0 {
        println!("No event matched {id}");
    } else {
        println!("Removed {removed} event(s)");
    }
    Ok(())
}
