use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::TryStreamExt;
use gcompute::resource::{Delete, GetMetadata, ServiceObject};
use gcompute::{format_api_error, paginate, Compute, Config, ListPage, Query};
use serde_json::{json, Map, Value};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Delay between operation polls with --wait
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Google Compute Engine from the command line
#[derive(Parser, Debug)]
#[command(name = "gcompute", version, about, long_about = None)]
struct Args {
    /// GCP project to use
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resources of one kind
    List {
        #[arg(value_enum)]
        kind: ResourceKind,

        /// Restrict disks, vms and autoscalers to one zone
        #[arg(short, long)]
        zone: Option<String>,

        /// Restrict addresses to one region
        #[arg(short, long)]
        region: Option<String>,

        /// API filter expression, e.g. "name eq web-.*"
        #[arg(long)]
        filter: Option<String>,

        #[arg(long)]
        max_results: Option<u32>,

        /// Continue from a previous page
        #[arg(long)]
        page_token: Option<String>,

        /// Follow page tokens until the listing is exhausted
        #[arg(long)]
        all: bool,
    },

    /// Create a firewall rule
    CreateFirewall {
        name: String,

        /// Allowed protocol with optional ports, e.g. tcp:80,443 or icmp
        #[arg(long = "allow", value_name = "PROTOCOL[:PORTS]")]
        allow: Vec<String>,

        /// Source CIDR range (repeatable)
        #[arg(long = "range")]
        ranges: Vec<String>,

        /// Source tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Network name, defaults to the project default network
        #[arg(long)]
        network: Option<String>,

        #[arg(long)]
        wait: bool,
    },

    /// Create a legacy network
    CreateNetwork {
        name: String,

        /// IPv4 range, e.g. 10.240.0.0/16
        #[arg(long)]
        range: Option<String>,

        #[arg(long)]
        gateway: Option<String>,

        #[arg(long)]
        wait: bool,
    },

    /// Delete a snapshot
    DeleteSnapshot {
        name: String,

        #[arg(long)]
        wait: bool,
    },

    /// Show (or wait for) an operation
    Operation {
        name: String,

        /// Zonal operation in this zone
        #[arg(long)]
        zone: Option<String>,

        /// Regional operation in this region
        #[arg(long, conflicts_with = "zone")]
        region: Option<String>,

        #[arg(long)]
        wait: bool,
    },

    /// Show or update the saved configuration
    Config {
        #[arg(long)]
        set_project: Option<String>,

        #[arg(long)]
        set_zone: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResourceKind {
    Addresses,
    Autoscalers,
    Disks,
    Firewalls,
    Networks,
    Services,
    Operations,
    Regions,
    Snapshots,
    Vms,
    Zones,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcompute started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcompute").join("gcompute.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcompute").join("gcompute.log");
    }
    PathBuf::from("gcompute.log")
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(args).await {
        tracing::error!("{err:?}");
        match err.downcast_ref::<gcompute::Error>() {
            Some(api_err) => eprintln!("Error: {}", format_api_error(api_err)),
            None => eprintln!("Error: {err:?}"),
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();
    let project = args.project;

    let output = match args.command {
        Command::Config {
            set_project,
            set_zone,
        } => {
            if let Some(project) = set_project {
                config.set_project(&project).context("Failed to save project")?;
            }
            if let Some(zone) = set_zone {
                config.set_zone(&zone).context("Failed to save zone")?;
            }
            json!({
                "project_id": config.effective_project(),
                "zone": config.effective_zone(),
                "base_url": config.base_url,
            })
        }
        Command::List {
            kind,
            zone,
            region,
            filter,
            max_results,
            page_token,
            all,
        } => {
            check_location_flags(kind, zone.as_deref(), region.as_deref())?;
            let compute = connect(project, &config).await?;
            let mut query = Query::new();
            if let Some(filter) = filter {
                query.insert("filter", filter);
            }
            if let Some(max_results) = max_results {
                query.insert("maxResults", max_results);
            }
            if let Some(token) = page_token {
                query = query.continued(&token);
            }
            list(&compute, kind, zone, region, query, all).await?
        }
        Command::CreateFirewall {
            name,
            allow,
            ranges,
            tags,
            network,
            wait,
        } => {
            let body = firewall_body(&allow, ranges, tags)?;
            let compute = connect(project, &config).await?;
            let created = match network {
                Some(network) => {
                    compute
                        .network(&network)
                        .create_firewall(&name, Value::Object(body))
                        .await?
                }
                None => compute.create_firewall(&name, Value::Object(body)).await?,
            };
            finish(created.operation, wait).await?
        }
        Command::CreateNetwork {
            name,
            range,
            gateway,
            wait,
        } => {
            let compute = connect(project, &config).await?;
            let mut body = Map::new();
            if let Some(range) = range {
                body.insert("range".to_string(), Value::String(range));
            }
            if let Some(gateway) = gateway {
                body.insert("gateway".to_string(), Value::String(gateway));
            }
            let created = compute.create_network(&name, Value::Object(body)).await?;
            finish(created.operation, wait).await?
        }
        Command::DeleteSnapshot { name, wait } => {
            let compute = connect(project, &config).await?;
            let operation = compute.snapshot(&name).delete().await?;
            finish(operation, wait).await?
        }
        Command::Operation {
            name,
            zone,
            region,
            wait,
        } => {
            let compute = connect(project, &config).await?;
            let mut operation = match (zone, region) {
                (Some(zone), _) => compute.zone(&zone).operation(&name),
                (None, Some(region)) => compute.region(&region).operation(&name),
                (None, None) => compute.operation(&name),
            };
            if wait {
                operation.wait_for_done(POLL_INTERVAL).await?
            } else {
                operation.get_metadata().await?
            }
        }
    };

    print(args.output, &output)
}

/// Build a client for `--project`, falling back to the saved configuration
async fn connect(project: Option<String>, config: &Config) -> Result<Compute> {
    let project = project.unwrap_or_else(|| config.effective_project());
    if project.is_empty() {
        anyhow::bail!("No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag");
    }
    tracing::info!("Using project: {}", project);

    let mut builder = Compute::builder().project_id(&project);
    if let Some(base_url) = &config.base_url {
        builder = builder.base_url(base_url.clone());
    }
    builder
        .build()
        .await
        .context("Failed to initialize Compute Engine client")
}

/// Build the create-firewall config from the CLI flags
fn firewall_body(allow: &[String], ranges: Vec<String>, tags: Vec<String>) -> Result<Map<String, Value>> {
    let mut body = Map::new();
    if !allow.is_empty() {
        body.insert("protocols".to_string(), Value::Object(parse_allow(allow)?));
    }
    if !ranges.is_empty() {
        body.insert("ranges".to_string(), json!(ranges));
    }
    if !tags.is_empty() {
        body.insert("tags".to_string(), json!(tags));
    }
    Ok(body)
}

/// `--zone` applies to zonal kinds only, `--region` to addresses only
fn check_location_flags(kind: ResourceKind, zone: Option<&str>, region: Option<&str>) -> Result<()> {
    let zonal = matches!(
        kind,
        ResourceKind::Disks | ResourceKind::Vms | ResourceKind::Autoscalers
    );
    let regional = matches!(kind, ResourceKind::Addresses);

    if zone.is_some() && !zonal {
        anyhow::bail!("--zone only applies to disks, vms and autoscalers");
    }
    if region.is_some() && !regional {
        anyhow::bail!("--region only applies to addresses");
    }
    Ok(())
}

/// Parse `--allow` values into a `protocols` map
fn parse_allow(allow: &[String]) -> Result<Map<String, Value>> {
    let mut protocols = Map::new();
    for entry in allow {
        let (protocol, ports) = match entry.split_once(':') {
            Some((protocol, ports)) => (protocol, ports),
            None => (entry.as_str(), ""),
        };
        if protocol.is_empty() {
            anyhow::bail!("Invalid --allow value '{}': missing protocol", entry);
        }
        let ports: Vec<Value> = ports
            .split(',')
            .filter(|p| !p.is_empty())
            .map(|p| match p.parse::<u16>() {
                Ok(port) => json!(port),
                Err(_) => json!(p),
            })
            .collect();
        protocols.insert(protocol.to_string(), Value::Array(ports));
    }
    Ok(protocols)
}

/// Optionally wait for an operation, then return its latest record
async fn finish(mut operation: gcompute::resource::Operation, wait: bool) -> Result<Value> {
    if wait {
        return Ok(operation.wait_for_done(POLL_INTERVAL).await?);
    }
    Ok(operation.metadata().cloned().unwrap_or(Value::Null))
}

/// One page, or every page when `all` is set
async fn collect<T, F, Fut>(query: Query, all: bool, mut fetch: F) -> Result<Value>
where
    T: ServiceObject,
    F: FnMut(Query) -> Fut,
    Fut: Future<Output = gcompute::Result<ListPage<T>>>,
{
    let (items, next_query): (Vec<T>, Option<Query>) = if all {
        let items: Vec<T> = paginate(Some(&query), fetch).try_collect().await?;
        (items, None)
    } else {
        let page = fetch(query).await?;
        (page.items, page.next_query)
    };

    let records: Vec<Value> = items
        .iter()
        .map(|item| {
            item.metadata()
                .cloned()
                .unwrap_or_else(|| json!({ "name": item.name() }))
        })
        .collect();

    Ok(json!({
        "items": records,
        "nextPageToken": next_query.as_ref().and_then(|q| q.page_token()),
    }))
}

async fn list(
    compute: &Compute,
    kind: ResourceKind,
    zone: Option<String>,
    region: Option<String>,
    query: Query,
    all: bool,
) -> Result<Value> {
    let c = compute.clone();
    match (kind, zone, region) {
        (ResourceKind::Disks, Some(zone), _) => {
            let zone = c.zone(&zone);
            collect(query, all, |q| {
                let zone = zone.clone();
                async move { zone.get_disks(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Vms, Some(zone), _) => {
            let zone = c.zone(&zone);
            collect(query, all, |q| {
                let zone = zone.clone();
                async move { zone.get_vms(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Autoscalers, Some(zone), _) => {
            let zone = c.zone(&zone);
            collect(query, all, |q| {
                let zone = zone.clone();
                async move { zone.get_autoscalers(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Addresses, _, Some(region)) => {
            let region = c.region(&region);
            collect(query, all, |q| {
                let region = region.clone();
                async move { region.get_addresses(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Addresses, _, None) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_addresses(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Autoscalers, None, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_autoscalers(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Disks, None, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_disks(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Vms, None, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_vms(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Firewalls, _, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_firewalls(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Networks, _, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_networks(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Services, _, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_services(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Operations, _, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_operations(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Regions, _, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_regions(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Snapshots, _, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_snapshots(Some(&q)).await }
            })
            .await
        }
        (ResourceKind::Zones, _, _) => {
            collect(query, all, |q| {
                let c = c.clone();
                async move { c.get_zones(Some(&q)).await }
            })
            .await
        }
    }
}

fn print(format: OutputFormat, value: &Value) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}
