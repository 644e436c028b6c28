//! Tempora CLI - convert date-times at the storage boundary and keep a UTC entry log

mod logging;
mod settings;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::{debug, info, warn};

use settings::{Overrides, Settings};
use tempora_core::domain::{DateTimeValue, Entry, Value};
use tempora_core::port::id_provider::UuidProvider;
use tempora_core::port::{platform, ConversionType, CustomPlatform, EntryRepository, IdProvider, Platform};
use tempora_core::UtcDateTimeType;
use tempora_infra_sqlite::{create_pool, run_migrations, SqliteEntryRepository};

const RANGE_START: &str = "0001-01-01T00:00:00Z";
const RANGE_END: &str = "9999-12-31T23:59:59Z";

#[derive(Parser)]
#[command(name = "tempora")]
#[command(about = "UTC date-time conversion for relational storage", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: ./tempora.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database URL or path
    #[arg(long, global = true, env = "TEMPORA_DATABASE_URL")]
    database: Option<String>,
}

/// Layout selection for the conversion commands
#[derive(Args, Default)]
struct LayoutArgs {
    /// Database platform whose date-time layout is used
    #[arg(long)]
    platform: Option<String>,

    /// Explicit date-time layout, overriding the platform's
    #[arg(long)]
    format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a date-time as the platform stores it (always UTC)
    ToStorage {
        /// RFC 3339 date-time, e.g. 2023-06-01T12:00:00+02:00
        value: String,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Read stored date-time text back as a UTC value
    FromStorage {
        /// Text in the platform layout, e.g. "2023-06-01 10:00:00"
        text: String,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Record a labelled entry
    Record {
        label: String,

        /// When it happened (RFC 3339)
        #[arg(long)]
        at: String,

        /// When it expires (RFC 3339)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Show one entry
    Show {
        id: String,
    },

    /// List entries in a half-open time range
    List {
        /// Range start, inclusive (RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// Range end, exclusive (RFC 3339)
        #[arg(long)]
        to: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct EntryView {
    id: String,
    label: String,
    occurred_at: String,
    expires_at: String,
    status: String,
}

impl EntryView {
    fn new(entry: &Entry, now: &DateTimeValue) -> Self {
        let status = if entry.is_expired_at(now) {
            "expired".red().to_string()
        } else {
            "active".green().to_string()
        };

        Self {
            id: entry.id.clone(),
            label: entry.label.clone(),
            occurred_at: entry.occurred_at.to_rfc3339(),
            expires_at: entry
                .expires_at
                .as_ref()
                .map(DateTimeValue::to_rfc3339)
                .unwrap_or_else(|| "-".to_string()),
            status,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let no_layout = LayoutArgs::default();
    let layout = match &cli.command {
        Commands::ToStorage { layout, .. } | Commands::FromStorage { layout, .. } => layout,
        _ => &no_layout,
    };

    let settings = Settings::load(
        cli.config.as_deref(),
        Overrides {
            database_url: cli.database.clone(),
            platform: layout.platform.clone(),
            datetime_format: layout.format.clone(),
        },
    )
    .context("Failed to load configuration")?;

    logging::init(settings.log_format, &settings.log_filter)?;
    debug!(?settings, "Configuration loaded");

    match cli.command {
        Commands::ToStorage { value, .. } => to_storage(&settings, &value),
        Commands::FromStorage { text, .. } => from_storage(&settings, text),
        Commands::Record { label, at, expires } => {
            let repo = open_repository(&settings).await?;
            record(&repo, label, &at, expires.as_deref()).await
        }
        Commands::Show { id } => {
            let repo = open_repository(&settings).await?;
            show(&repo, id).await
        }
        Commands::List { from, to, json } => {
            let repo = open_repository(&settings).await?;
            list(&repo, from.as_deref(), to.as_deref(), json).await
        }
    }
}

fn resolve_platform(settings: &Settings) -> Result<Box<dyn Platform>> {
    if let Some(layout) = &settings.datetime_format {
        return Ok(Box::new(CustomPlatform::new(
            settings.platform.clone(),
            layout.clone(),
        )));
    }

    platform::by_name(&settings.platform)
        .ok_or_else(|| anyhow!("Unknown platform '{}' (set datetime_format for custom platforms)", settings.platform))
}

fn parse_datetime(text: &str) -> Result<DateTimeValue> {
    DateTimeValue::parse_rfc3339(text)
        .ok_or_else(|| anyhow!("'{}' is not an RFC 3339 date-time", text))
}

fn to_storage(settings: &Settings, value: &str) -> Result<()> {
    let platform = resolve_platform(settings)?;
    let value = parse_datetime(value)?;

    let stored = UtcDateTimeType::new()
        .to_storage(value.into(), platform.as_ref())
        .context("Conversion to storage failed")?;

    println!("{}", stored);
    Ok(())
}

fn from_storage(settings: &Settings, text: String) -> Result<()> {
    let platform = resolve_platform(settings)?;

    let loaded = UtcDateTimeType::new()
        .from_storage(Value::Text(text), platform.as_ref())
        .context("Conversion from storage failed")?;

    match loaded {
        Some(value) => println!("{}", value),
        None => println!("NULL"),
    }
    Ok(())
}

async fn open_repository(settings: &Settings) -> Result<SqliteEntryRepository> {
    info!(database_url = %settings.database_url, "Opening database");

    if !settings.uses_sqlite_layout() {
        warn!(
            platform = %settings.platform,
            datetime_format = ?settings.datetime_format,
            "Entry storage always uses the SQLite layout; configured layout ignored"
        );
    }

    let pool = create_pool(&settings.database_url)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    Ok(SqliteEntryRepository::new(pool))
}

async fn record(
    repo: &dyn EntryRepository,
    label: String,
    at: &str,
    expires: Option<&str>,
) -> Result<()> {
    let occurred_at = parse_datetime(at)?;
    let expires_at = expires.map(parse_datetime).transpose()?;

    let entry = Entry::new(UuidProvider.generate_id(), label, occurred_at, expires_at)?;
    repo.insert(&entry).await.context("Failed to store entry")?;

    println!("{} {}", "✓ Recorded".green().bold(), entry.id);
    Ok(())
}

async fn show(repo: &dyn EntryRepository, id: String) -> Result<()> {
    match repo.find_by_id(&id).await? {
        Some(entry) => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
            if entry.is_expired_at(&DateTimeValue::utc(Utc::now())) {
                println!("{}", "expired".red());
            }
            Ok(())
        }
        None => Err(anyhow!("Entry {} not found", id)),
    }
}

async fn list(
    repo: &dyn EntryRepository,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let from = parse_datetime(from.unwrap_or(RANGE_START))?;
    let to = parse_datetime(to.unwrap_or(RANGE_END))?;

    let entries = repo.find_between(&from, &to).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("{}", "No entries in range".yellow());
    } else {
        let now = DateTimeValue::utc(Utc::now());
        let views: Vec<EntryView> = entries.iter().map(|e| EntryView::new(e, &now)).collect();
        println!("{}", Table::new(views));
    }
    Ok(())
}
