//! EDR fetch tool
//!
//! Queries an OGC EDR API through `edr-client` and prints normalized JSON:
//! collection metadata with temporal extents, grouped location lists and
//! location data.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use edr_client::{unique_by, ClientConfig, ClientError, EdrClient, GroupingKey, HttpTransport, LocationQuery};
use edr_protocol::Identifier;

/// EDR fetch tool
#[derive(Parser, Debug)]
#[command(name = "edr-fetch")]
#[command(about = "Fetch and normalize data from an OGC EDR API")]
struct Args {
    /// Root URL of the EDR API (overrides the config file)
    #[arg(long, env = "EDR_BASE_URL")]
    base_url: Option<String>,

    /// YAML client configuration
    #[arg(short, long, env = "EDR_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum pages per query (overrides the config file)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List collections with their temporal extents
    Collections,

    /// Show one collection's metadata
    Collection {
        /// Collection id
        id: String,
    },

    /// Fetch all locations of a collection and group them
    Locations {
        /// Collection id
        collection: String,

        /// Parameter to request (repeatable)
        #[arg(long = "parameter-name")]
        parameter_names: Vec<String>,

        /// Instant or interval, e.g. 2024-01-01T00:00:00Z/..
        #[arg(long)]
        datetime: Option<String>,

        /// Page size hint for the server
        #[arg(long)]
        limit: Option<u32>,

        /// Group by collection or layer (default from config)
        #[arg(long)]
        group_by: Option<GroupingKey>,

        /// Layer id to tag the locations with
        #[arg(long)]
        layer: Option<String>,

        /// Keep only the first location per value of this property
        #[arg(long)]
        unique_by: Option<String>,
    },

    /// Fetch data for one location
    Location {
        /// Collection id
        collection: String,

        /// Location id (numeric ids are sent as numbers)
        id: String,

        /// Parameter to request (repeatable)
        #[arg(long = "parameter-name")]
        parameter_names: Vec<String>,

        /// Instant or interval
        #[arg(long)]
        datetime: Option<String>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    info!(base_url = %config.base_url, "Starting EDR fetch");
    let client = EdrClient::from_config(config)?;

    // Ctrl-C abandons the in-flight query.
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling query");
            interrupt.cancel();
        }
    });

    let output = match args.command {
        Command::Collections => collections(&client, &cancel).await?,
        Command::Collection { id } => collection(&client, &id, &cancel).await?,
        Command::Locations {
            collection,
            parameter_names,
            datetime,
            limit,
            group_by,
            layer,
            unique_by,
        } => {
            let mut query = LocationQuery::new();
            query.parameter_names = parameter_names;
            query.datetime = datetime;
            query.limit = limit;
            query.layer_id = layer;
            locations(&client, &collection, &query, group_by, unique_by.as_deref(), &cancel).await?
        }
        Command::Location {
            collection,
            id,
            parameter_names,
            datetime,
        } => {
            let mut query = LocationQuery::new();
            query.parameter_names = parameter_names;
            query.datetime = datetime;
            location(&client, &collection, &parse_identifier(&id), &query, &cancel).await?
        }
    };

    print_json(&output)
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match (&args.config, &args.base_url) {
        (Some(path), _) => ClientConfig::load_from_file(path)?,
        (None, Some(base_url)) => ClientConfig::new(base_url.clone()),
        (None, None) => {
            return Err(anyhow!(
                "No EDR API given: pass --base-url, set EDR_BASE_URL or provide --config"
            ))
        }
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = Some(max_pages);
    }
    Ok(config)
}

async fn collections(client: &EdrClient<HttpTransport>, cancel: &CancellationToken) -> Result<Value> {
    let list = client
        .get_collections(cancel)
        .await
        .context("Failed to list collections")?;

    let summaries: Vec<Value> = list
        .collections
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "title": c.label(),
                "temporal_extent": c.temporal_extent(),
                "parameters": c.parameter_ids(),
            })
        })
        .collect();
    Ok(Value::Array(summaries))
}

async fn collection(client: &EdrClient<HttpTransport>, id: &str, cancel: &CancellationToken) -> Result<Value> {
    let collection = client
        .get_collection(id, cancel)
        .await
        .with_context(|| format!("Failed to fetch collection {}", id))?;

    Ok(json!({
        "temporal_extent": collection.temporal_extent(),
        "collection": collection,
    }))
}

async fn locations(
    client: &EdrClient<HttpTransport>,
    collection_id: &str,
    query: &LocationQuery,
    group_by: Option<GroupingKey>,
    unique_property: Option<&str>,
    cancel: &CancellationToken,
) -> Result<Value> {
    let mut locations = match client.get_locations(collection_id, query, cancel).await {
        Ok(locations) => locations,
        Err(e) => return Err(report_partial(e)),
    };
    if let Some(property) = unique_property {
        locations = unique_by(&locations, property);
    }

    let key = group_by.unwrap_or_else(|| client.grouping());
    let groups = edr_client::group_locations(&locations, key);
    info!(locations = locations.len(), groups = groups.len(), %key, "Grouped locations");

    Ok(json!({
        "grouped_by": key,
        "groups": groups,
        "locations": locations,
    }))
}

async fn location(
    client: &EdrClient<HttpTransport>,
    collection_id: &str,
    id: &Identifier,
    query: &LocationQuery,
    cancel: &CancellationToken,
) -> Result<Value> {
    match client.get_location(collection_id, id, query, cancel).await {
        Ok(response) => Ok(serde_json::to_value(&response)?),
        Err(e) => Err(report_partial(e)),
    }
}

/// Print whatever a partial fetch collected, then fail with its error.
fn report_partial(err: ClientError) -> anyhow::Error {
    if let Some(partial) = err.partial() {
        warn!(
            pages_fetched = partial.pages_fetched,
            failed_url = %partial.failed_url,
            "Printing incomplete result"
        );
        if let Err(e) = serde_json::to_value(&partial.data).map_err(anyhow::Error::from).and_then(|v| print_json(&v)) {
            warn!(error = %e, "Failed to print partial result");
        }
    }
    anyhow::Error::new(err)
}

fn parse_identifier(raw: &str) -> Identifier {
    raw.parse::<i64>()
        .map(Identifier::from)
        .unwrap_or_else(|_| Identifier::from(raw))
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}
