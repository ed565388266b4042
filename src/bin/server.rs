//! simbridge Demo Host
//!
//! Serves an in-memory simulation world through the bridge. Stands in for a
//! real host during development; the probe CLI can connect to it.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use simbridge::protocol::Dimension;
use simbridge::{Bridge, Config, MemoryProvider};

/// simbridge demo host
#[derive(Parser, Debug)]
#[command(name = "simbridge-server")]
#[command(about = "Demo simulation host serving the local RPC bridge")]
#[command(version)]
struct Args {
    /// Explicit socket path (default: derived from temp dir and user)
    #[arg(short, long)]
    socket: Option<String>,

    /// Application name used in the derived socket path
    #[arg(short, long, default_value = "simbridge")]
    app_name: String,

    /// Watchdog poll interval in milliseconds
    #[arg(short, long, default_value = "1000")]
    watchdog_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,simbridge=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("simbridge demo host v{}", simbridge::VERSION);

    let mut builder = Config::builder()
        .app_name(&args.app_name)
        .watchdog_interval(Duration::from_millis(args.watchdog_ms));
    if let Some(socket) = &args.socket {
        builder = builder.socket_path(socket);
    }
    let config = builder.build();

    let provider = Arc::new(demo_world());
    let handle = Bridge::start(config, provider);

    tracing::info!(
        "serving on {} (close stdin to stop)",
        handle.socket_path().display()
    );

    // Serve until stdin closes
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        if line.is_err() {
            break;
        }
    }

    tracing::info!("shutting down");
    handle.stop();
}

/// A small world with a seated player, a few entities and a block palette
fn demo_world() -> MemoryProvider {
    let provider = MemoryProvider::new();

    provider.add_world(Dimension::Overworld);
    provider.add_world(Dimension::Nether);

    provider.spawn(Dimension::Overworld, 1, "player", Some(20.0));
    provider.spawn(Dimension::Overworld, 2, "pig", Some(10.0));
    provider.spawn(Dimension::Overworld, 3, "zombie", Some(20.0));
    provider.spawn(Dimension::Overworld, 4, "marker", None);
    provider.seat_player("Steve", Dimension::Overworld, 1);

    provider.register_block_kind("stone", false);
    provider.register_block_kind("dirt", false);
    provider.register_block_kind("wool", true);

    provider
}
