//! Lineage Integrator CLI
//!
//! Usage:
//!   lineage-integrator relay [--config path]
//!   lineage-integrator demo [--config path]

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use lineage_integrator::{
    AssetProperties, ConnectorConfig, ElementId, ElementStatus, EffectiveWindow, FlowProperties,
    InMemoryMetadataStore, LineageIntegratorContext, ListenerError, OpenLineageListener,
    OpenLineageRunEvent, Paging, PortProperties, PortType, ProcessProperties,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lineage-integrator",
    version,
    about = "Lineage integration context for metadata connectors"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to the connector configuration (YAML)
    #[arg(long, global = true, env = "LINEAGE_INTEGRATOR_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read OpenLineage run events (one JSON document per line) from stdin
    /// and publish them to a logging listener
    Relay,
    /// Build a small process/port/data-flow lineage graph in memory and
    /// print it
    Demo,
}

/// Source guid used when no configuration file is found
const CLI_SOURCE_GUID: &str = "lineage-integrator-cli";

/// Default config path (~/.config/lineage-integrator/connector.yaml)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lineage-integrator").join("connector.yaml"))
}

fn load_config(path: Option<PathBuf>) -> Result<ConnectorConfig, String> {
    match path {
        Some(path) => ConnectorConfig::from_yaml_file(&path)
            .map_err(|e| format!("failed to load {}: {}", path.display(), e)),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => ConnectorConfig::from_yaml_file(&path)
                .map_err(|e| format!("failed to load {}: {}", path.display(), e)),
            None => Ok(ConnectorConfig::new(
                "lineage-integrator-cli",
                "lineage-integrator",
                CLI_SOURCE_GUID,
                "lineage-integrator-cli",
            )),
        },
    }
}

fn open_context(config: ConnectorConfig) -> Result<LineageIntegratorContext, String> {
    LineageIntegratorContext::new(config, Arc::new(InMemoryMetadataStore::new()))
        .map_err(|e| format!("failed to create context: {}", e))
}

/// Writes every event it receives to the log
struct LoggingListener;

#[async_trait]
impl OpenLineageListener for LoggingListener {
    fn listener_name(&self) -> &str {
        "logging"
    }

    async fn process_open_lineage_run_event(
        &self,
        event: Option<&OpenLineageRunEvent>,
        raw_event: &str,
    ) -> Result<(), ListenerError> {
        match event {
            Some(event) => tracing::info!(
                job = %format!("{}/{}", event.job.namespace, event.job.name),
                run_id = %event.run.run_id,
                event_type = ?event.event_type,
                inputs = event.inputs.len(),
                outputs = event.outputs.len(),
                "OpenLineage run event"
            ),
            None => tracing::info!(raw = raw_event, "Unparsed OpenLineage event"),
        }
        Ok(())
    }
}

async fn relay(ctx: &LineageIntegratorContext) -> Result<(usize, usize), String> {
    ctx.register_listener(Arc::new(LoggingListener));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut published = 0;
    let mut unparsed = 0;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("failed to read stdin: {}", e))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let report = match OpenLineageRunEvent::from_json(line) {
            Ok(event) => ctx.publish_open_lineage_run_event(event).await,
            Err(e) => {
                tracing::warn!(error = %e, "Event is not a valid run event; relaying raw");
                unparsed += 1;
                ctx.publish_raw_open_lineage_run_event(line).await
            }
        };
        for failure in &report.failures {
            eprintln!("Warning: listener '{}' {}", failure.listener, failure.reason);
        }
        published += 1;
    }
    Ok((published, unparsed))
}

fn cmd_relay(config: ConnectorConfig) -> i32 {
    let ctx = match open_context(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            return 1;
        }
    };
    match rt.block_on(relay(&ctx)) {
        Ok((published, unparsed)) => {
            println!("Relayed {} events ({} unparsed)", published, unparsed);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn build_demo(ctx: &LineageIntegratorContext) -> lineage_integrator::LineageResult<ElementId> {
    let process = ctx.create_process(
        true,
        ElementStatus::Active,
        None,
        ProcessProperties::new("etl.load_orders").with_display_name("Load orders"),
    )?;
    let in_port = ctx.create_port(
        true,
        None,
        PortProperties::new("etl.load_orders.in").with_port_type(PortType::InIn),
    )?;
    let out_port = ctx.create_port(
        true,
        None,
        PortProperties::new("etl.load_orders.out").with_port_type(PortType::OutOut),
    )?;
    ctx.setup_process_port(true, &process, &in_port, EffectiveWindow::always(), None)?;
    ctx.setup_process_port(true, &process, &out_port, EffectiveWindow::always(), None)?;

    let source = ctx.create_asset(
        true,
        None,
        AssetProperties::new("s3://raw/orders.csv").with_type_name("DataFile"),
    )?;
    let target = ctx.create_asset(
        true,
        None,
        AssetProperties::new("postgres://dw/public.orders").with_type_name("RelationalTable"),
    )?;
    ctx.setup_data_flow(true, &source, &in_port, FlowProperties::named("orders-in"), None)?;
    ctx.setup_data_flow(true, &out_port, &target, FlowProperties::named("orders-out"), None)?;
    ctx.publish_asset(&target, None)?;
    Ok(process)
}

fn print_demo(ctx: &LineageIntegratorContext, process: &ElementId) -> lineage_integrator::LineageResult<()> {
    let process = ctx.get_process_by_guid(process, None)?;
    println!("Process {} ({})", process.qualified_name().unwrap_or("?"), process.guid);
    for port in ctx.get_ports_for_process(&process.guid, Paging::default(), None)? {
        println!("  port {}", port.element.qualified_name().unwrap_or("?"));
        for supplier in ctx.get_data_flow_suppliers(&port.element.guid, Paging::default(), None)? {
            println!("    <- {}", supplier.element.qualified_name().unwrap_or("?"));
        }
        for consumer in ctx.get_data_flow_consumers(&port.element.guid, Paging::default(), None)? {
            println!(
                "    -> {} (zones: {})",
                consumer.element.qualified_name().unwrap_or("?"),
                consumer.element.zone_membership.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_demo(config: ConnectorConfig) -> i32 {
    let ctx = match open_context(config.with_integration_report(true)) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let result = build_demo(&ctx).and_then(|process| print_demo(&ctx, &process));
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return 1;
    }
    if let Some(report) = ctx.take_integration_report() {
        println!(
            "Created {} elements and relationships, updated {}",
            report.created_elements.len(),
            report.updated_elements.len()
        );
    }
    0
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let code = match cli.command {
        Commands::Relay => cmd_relay(config),
        Commands::Demo => cmd_demo(config),
    };
    std::process::exit(code);
}
