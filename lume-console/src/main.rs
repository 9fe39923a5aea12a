//! Lume Discovery Console
//!
//! A headless consumer for the discovery registry: wires up the registry
//! actor, optionally a simulated transport, and either streams membership
//! changes (`watch`) or prints a one-shot view of every known service
//! (`list`).

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lume_record::ServiceKind;
use lume_registry::{start_registry, RegistryConfig, RegistryHandle, ServiceUpdate};
use lume_sim::{run_sim_transport, SimPeer, SimTransport};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lume-console", version, about = "Console for the Lume discovery registry")]
struct Cli {
    /// Answer scan triggers with simulated peers instead of real transports
    #[arg(long)]
    simulate: bool,

    /// Print output as line-delimited JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Subscribe to the registry and stream membership changes
    Watch {
        /// Seconds between full rescans
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },

    /// Run one full scan, let transports answer, and print every service
    List {
        /// Seconds to wait for transports to answer before printing
        #[arg(long, default_value_t = 2)]
        settle: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "lume_console=info,lume_record=info,lume_detect=info,lume_registry=info,lume_sim=info"
                .into()
        }))
        .init();

    let cli = Cli::parse();

    info!("Starting Lume discovery console");
    let registry = start_registry(RegistryConfig::default());

    if cli.simulate {
        tokio::spawn(run_sim_transport(registry.clone(), demo_transport()));
    }

    match cli.command {
        Command::Watch { interval } => watch(registry, cli.json, interval).await,
        Command::List { settle } => list(registry, cli.json, settle).await,
    }
}

/// Stream membership changes until interrupted
async fn watch(registry: RegistryHandle, json: bool, interval: u64) -> Result<()> {
    let mut updates = registry.subscribe();

    let mut rescan = tokio::time::interval(Duration::from_secs(interval.max(1)));
    rescan.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // the first tick completes immediately and doubles as the initial scan
    rescan.tick().await;
    registry.request_full_scan().await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                registry.shutdown().await.ok();
                break;
            }
            _ = rescan.tick() => {
                registry.request_full_scan().await?;
            }
            update = updates.recv() => match update {
                Ok(update) => print_update(&update, json)?,
                Err(RecvError::Lagged(missed)) => {
                    warn!("Dropped {} update(s); next update restores the full set", missed);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    Ok(())
}

/// One-shot view of every known service
async fn list(registry: RegistryHandle, json: bool, settle: u64) -> Result<()> {
    registry.request_full_scan().await?;
    tokio::time::sleep(Duration::from_secs(settle)).await;

    // per-category queries sweep first, so the view is post-expiry
    let mut services = Vec::new();
    for kind in ServiceKind::RETAINED {
        services.extend(registry.services(kind).await?);
    }

    if json {
        println!("{}", serde_json::to_string(&services)?);
    } else if services.is_empty() {
        println!("No services discovered");
    } else {
        for record in &services {
            println!("{record}");
        }
    }

    registry.shutdown().await.ok();
    Ok(())
}

fn print_update(update: &ServiceUpdate, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(update)?);
        return Ok(());
    }

    println!(
        "{}: {} service(s)",
        update.kind.display_name(),
        update.services.len()
    );
    for record in &update.services {
        println!("  - {record}");
    }
    Ok(())
}

/// Scripted peers for `--simulate`
fn demo_transport() -> SimTransport {
    SimTransport::with_peers(vec![
        SimPeer::new(ServiceKind::Session, "10.0.0.10", 8090, "desk"),
        SimPeer::new(ServiceKind::BulbBridge, "10.0.0.5", 80, "bridge1"),
        SimPeer::new(ServiceKind::WifiStrip, "10.0.0.7", 80, "strip-living-room"),
        SimPeer::new(ServiceKind::WifiStrip, "10.0.0.8", 80, "strip-hall"),
    ])
}
