//! BinIdx Server Binary
//!
//! Starts the TCP server for BinIdx.

use std::sync::Arc;

use binidx::network::Server;
use binidx::record::ValuePolicy;
use binidx::{Config, Engine};
use clap::Parser;
use parking_lot::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// BinIdx Server
#[derive(Parser, Debug)]
#[command(name = "binidx-server")]
#[command(about = "Two-region record store with a binary-searched index")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./binidx_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    listen: String,

    /// Number of connection worker threads
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Reject values longer than 60 bytes instead of truncating them
    #[arg(long)]
    reject_long_values: bool,

    /// Records generated by RESET when the client gives no count
    #[arg(long, default_value = "10000")]
    reset_count: usize,

    /// Largest record count a client may request from RESET
    #[arg(long, default_value = "100000")]
    max_reset_count: usize,

    /// Largest iteration count a client may request from BENCHMARK
    #[arg(long, default_value = "10000")]
    max_benchmark_iterations: usize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,binidx=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("BinIdx Server v{}", binidx::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    let policy = if args.reject_long_values {
        ValuePolicy::Reject
    } else {
        ValuePolicy::Truncate
    };

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .value_policy(policy)
        .bulk_reset_count(args.reset_count)
        .max_reset_count(args.max_reset_count)
        .max_benchmark_iterations(args.max_benchmark_iterations)
        .build();

    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(Mutex::new(e)),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized successfully");

    let server = match Server::bind(config, Arc::clone(&engine)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
    drop(server);

    match Arc::try_unwrap(engine) {
        Ok(engine) => {
            if let Err(e) = engine.into_inner().close() {
                tracing::error!("Failed to close engine: {}", e);
                std::process::exit(1);
            }
        }
        Err(_) => tracing::warn!("Engine still shared at shutdown, skipping close"),
    }
}
