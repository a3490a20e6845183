//! iqlink feed bridge - entry point.
//!
//! Connects to the feed daemon's admin, quote, and historical channels
//! and republishes the translated event stream.

use anyhow::Result;
use clap::Parser;
use iqlink_core::BridgeEvent;
use std::sync::Arc;
use tracing::{debug, info};

/// Bridge between a market data feed daemon and bridge events.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via IQLINK_CONFIG)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    iqlink_telemetry::init_logging()?;
    info!("Starting iqlink bridge v{}", env!("CARGO_PKG_VERSION"));

    let config = iqlink_bridge::AppConfig::load(args.config)?;
    info!(
        host = %config.feed.host,
        admin_port = config.feed.admin_port,
        quote_port = config.feed.quote_port,
        lookup_port = config.feed.lookup_port,
        "Configuration loaded"
    );

    let (events, mut event_rx) = iqlink_feed::event_channel();
    let bridge = Arc::new(iqlink_bridge::Bridge::new(config, events));
    bridge.clone().start();

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(BridgeEvent::Connected(up)) => {
                    info!(connected = up, "Feed status changed");
                }
                Some(BridgeEvent::Tick(tick)) => {
                    debug!(symbol = %tick.symbol, last = %tick.last, bid = %tick.bid, ask = %tick.ask, "Tick");
                }
                Some(BridgeEvent::Bar { bar, client }) => {
                    debug!(symbol = %bar.symbol, date = bar.date, time = bar.time, client = %client, "Bar");
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    bridge.shutdown();
    Ok(())
}
