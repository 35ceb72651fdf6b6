//! Fleetbook audit router CLI
//!
//! Reads newline-delimited JSON events, routes them through the audit
//! router, and persists durable events to JSONL sink files.

use anyhow::Context as _;
use clap::Parser;
use fleetbook_audit::{
    AuditConfig, Context, CorrelationContext, EventRouter, JsonlAuditStore, Severity, SeverityGate,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "fleetbook-audit",
    about = "Audit event router for the Fleetbook rental platform",
    version
)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, default_value = "audit-router.yaml")]
    config: PathBuf,

    /// Input file with one JSON event per line (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the JSONL audit stores are written to
    #[arg(short = 'd', long, default_value = "audit-logs")]
    audit_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: String,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

/// Wire shape of one ingested event. The category stays a raw string here;
/// normalization is the router's job.
#[derive(Debug, Deserialize)]
struct IngestEvent {
    category: String,
    message: String,
    #[serde(default)]
    context: Context,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    object_id: Option<i64>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    level: Severity,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    if args.print_config {
        let config = AuditConfig::default();
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    let config = if args.config.exists() {
        let content = tokio::fs::read_to_string(&args.config)
            .await
            .with_context(|| format!("reading {}", args.config.display()))?;
        let config: AuditConfig = serde_yaml::from_str(&content)?;
        info!(path = %args.config.display(), "Loaded configuration");
        config
    } else if args.validate {
        anyhow::bail!("configuration file not found: {}", args.config.display());
    } else {
        info!("Using default configuration");
        AuditConfig::default()
    };

    config.validate()?;

    if args.validate {
        info!("Configuration is valid");
        println!("Configuration Summary:");
        println!("  Minimum level: {}", config.min_level);
        println!("  Redaction marker: {}", config.redaction.marker);
        println!("  Extra sensitive terms: {}", config.redaction.extra_terms.len());
        println!("  Sink timeout: {:?} ms", config.sink_timeout_ms);
        return Ok(());
    }

    let user_store = Arc::new(JsonlAuditStore::create(args.audit_dir.join("user.jsonl")).await?);
    let transaction_store =
        Arc::new(JsonlAuditStore::create(args.audit_dir.join("transaction.jsonl")).await?);
    let general_store =
        Arc::new(JsonlAuditStore::create(args.audit_dir.join("general.jsonl")).await?);

    let router = EventRouter::new(
        &config,
        CorrelationContext::new(),
        Arc::clone(&user_store) as Arc<dyn fleetbook_audit::UserAuditSink>,
        Arc::clone(&transaction_store) as Arc<dyn fleetbook_audit::TransactionAuditSink>,
        Arc::clone(&general_store) as Arc<dyn fleetbook_audit::GeneralAuditSink>,
    )?;
    let gate = SeverityGate::new(config.min_level);

    info!(
        correlation_id = %router.correlation_id(),
        audit_dir = %args.audit_dir.display(),
        "Audit router started"
    );

    let reader: Box<dyn AsyncBufRead + Unpin> = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut ingested = 0u64;
    let mut durable = 0u64;
    let mut ephemeral = 0u64;
    let mut rejected = 0u64;
    let mut malformed = 0u64;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event: IngestEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, "Skipping malformed event line");
                malformed += 1;
                continue;
            }
        };

        ingested += 1;
        let passed_gate = gate.should_log(event.level);
        let record_id = router
            .log_event(
                &event.category,
                &event.message,
                event.context,
                event.user_id,
                event.object_id,
                event.ip.as_deref(),
                event.level,
            )
            .await;

        if !passed_gate {
            rejected += 1;
        } else if record_id.is_some() {
            durable += 1;
        } else {
            ephemeral += 1;
        }
    }

    user_store.flush().await?;
    transaction_store.flush().await?;
    general_store.flush().await?;

    println!("Ingested:  {ingested}");
    println!("Durable:   {durable}");
    println!("Ephemeral: {ephemeral}");
    println!("Rejected:  {rejected}");
    println!("Malformed: {malformed}");

    Ok(())
}
