use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use kith::activity::SnapshotBuilder;
use kith::classify::RemoteClassifier;
use kith::config::Config;
use kith::decision::DecisionEngine;
use kith::graph::{GraphClient, UserId};
use kith::store::{SnapshotStore, SqliteStore};

/// Kith: social-graph trust decisions for profile re-authentication.
///
/// Decides whether a returning account still behaves like the person who
/// built its trust network: are the anchor accounts still linked, and did
/// the account's interests move gradually or jump?
#[derive(Parser)]
#[command(name = "kith", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Run a full allow/deny decision for a user
    Decide {
        /// Numeric user id or @handle
        user: String,

        /// Activity window start (RFC 3339). Defaults to the user's
        /// previous snapshot.
        #[arg(long)]
        since: Option<String>,

        /// Anchor account id (repeatable). Overrides KITH_ANCHORS.
        #[arg(long = "anchor")]
        anchors: Vec<UserId>,
    },

    /// Build and store one activity snapshot without deciding
    Snapshot {
        /// Numeric user id or @handle
        user: String,

        /// Activity window start (RFC 3339). Defaults to the user's
        /// previous snapshot.
        #[arg(long)]
        since: Option<String>,
    },

    /// Show a user's stored snapshot history
    History {
        /// Numeric user id or @handle
        user: String,
    },

    /// List audited decisions
    Decisions {
        /// Limit the listing to one user (id or @handle)
        user: Option<String>,

        /// Max records to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show system status (DB stats, last decision)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kith=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Kith database...");
            let config = Config::load()?;
            let conn = kith::store::initialize(&config.db_path)?;
            let table_count = kith::store::schema::table_count(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nKith is ready. Next step: set up your .env file");
            println!("  (see .env.example for required variables)");
            println!("\nThen run: cargo run -- decide <user>");
        }

        Commands::Decide {
            user,
            since,
            anchors,
        } => {
            let config = Config::load()?;
            config.require_graph()?;
            config.require_classifier()?;
            let store = open_store(&config)?;

            let subject = resolve_user(&config, &user).await?;
            let since = parse_since(since.as_deref())?;

            // Command-line anchors win over the environment list.
            let anchor_ids = if anchors.is_empty() {
                config.require_anchors()?;
                config.anchors.clone()
            } else {
                anchors
            };

            println!("Deciding re-authentication for user {subject}...");

            let provider = Arc::new(GraphClient::new(
                &config.graph_api_url,
                &config.graph_api_token,
            )?);
            let classifier = Arc::new(RemoteClassifier::new(
                &config.classifier_api_url,
                &config.classifier_api_key,
            )?);

            let engine =
                DecisionEngine::new(provider, classifier, store, config.evidence_timeout)?;
            let record = engine.decide(subject, anchor_ids, since).await?;

            kith::output::terminal::display_decision(&record);
        }

        Commands::Snapshot { user, since } => {
            let config = Config::load()?;
            config.require_graph()?;
            config.require_classifier()?;
            let store = open_store(&config)?;

            let subject = resolve_user(&config, &user).await?;
            let baseline = match parse_since(since.as_deref())? {
                Some(at) => Some(at),
                None => store.latest_snapshot_at(subject).await?,
            };

            println!("Building activity snapshot for user {subject}...");

            let provider = Arc::new(GraphClient::new(
                &config.graph_api_url,
                &config.graph_api_token,
            )?);
            let classifier = Arc::new(RemoteClassifier::new(
                &config.classifier_api_url,
                &config.classifier_api_key,
            )?);
            let builder = SnapshotBuilder::new(provider, classifier)?;

            let snapshot = builder.build(subject, &config.anchors, baseline).await;
            store.append(&snapshot).await?;

            kith::output::terminal::display_snapshot(&snapshot);
            println!("{}", "Snapshot stored.".bold());
        }

        Commands::History { user } => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            let subject = resolve_user(&config, &user).await?;

            let history = store.read_history(subject).await?;
            kith::output::terminal::display_history(subject, &history);
        }

        Commands::Decisions { user, limit } => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            let subject = match user {
                Some(user) => Some(resolve_user(&config, &user).await?),
                None => None,
            };

            let records = store.recent_decisions(subject, limit).await?;
            kith::output::terminal::display_decisions(&records);
        }

        Commands::Status => {
            let config = Config::load()?;
            kith::status::show(&config).await?;
        }
    }

    Ok(())
}

/// Open the store over the configured SQLite database.
fn open_store(config: &Config) -> Result<Arc<dyn SnapshotStore>> {
    let conn = kith::store::open(&config.db_path)?;
    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Accept a numeric user id directly, or resolve an @handle through the
/// graph provider.
async fn resolve_user(config: &Config, user: &str) -> Result<UserId> {
    let trimmed = user.strip_prefix('@').unwrap_or(user);
    if let Ok(id) = trimmed.parse::<UserId>() {
        return Ok(id);
    }

    config.require_graph()?;
    let client = GraphClient::new(&config.graph_api_url, &config.graph_api_token)?;
    let id = client.resolve_handle(trimmed).await?;
    info!(handle = trimmed, id, "Resolved handle to user id");
    Ok(id)
}

/// Parse an RFC 3339 timestamp from --since.
fn parse_since(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw).with_context(|| {
                format!("--since must be RFC 3339 (e.g. 2024-05-01T00:00:00Z), got '{raw}'")
            })?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
        None => Ok(None),
    }
}
