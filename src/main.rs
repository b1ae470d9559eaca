use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use hashfs::config::Config;
use hashfs::fs::HashFs;
use hashfs::server::{self, AssetService};
use hashfs::source::DirSource;

/// Hashfs - serve static assets under content-hashed filenames
#[derive(Parser, Debug)]
#[command(name = "hashfs")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Hash the configured warm-up paths, print the manifest as JSON and exit
    #[arg(long)]
    print_manifest: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = hashfs::logging::init_subscriber(args.json_logs) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        tracing::error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    // Unsupported hash algorithms are rejected here, before anything is served
    let config = Config::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.validate()?;

    tracing::info!(
        config_file = %args.config.display(),
        root = %config.assets.root.display(),
        algorithm = %config.hashing.algorithm,
        location = %config.hashing.location,
        hash_length = config.hashing.effective_hash_len(),
        max_age_seconds = config.hashing.max_age().as_secs(),
        "Configuration loaded successfully"
    );

    if args.test {
        println!("configuration {} is valid", args.config.display());
        return Ok(());
    }

    let source = DirSource::new(&config.assets.root);
    let hfs = Arc::new(HashFs::new(source, config.hashing.clone()));

    let report = hfs.warm(&config.warm).await;
    for path in &report.failed {
        tracing::warn!(path = %path, "Could not hash warm-up path, it will be served unhashed");
    }
    tracing::info!(
        hashed = report.hashed.len(),
        failed = report.failed.len(),
        "Warm-up complete"
    );

    if args.print_manifest {
        println!("{}", serde_json::to_string_pretty(&hfs.manifest())?);
        return Ok(());
    }

    let service = Arc::new(
        AssetService::new(Arc::clone(&hfs)).with_mount_prefix(&config.server.mount_prefix),
    );

    let listen_addr = config.listen_address();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("binding {}", listen_addr))?;

    tracing::info!(
        address = %listen_addr,
        mount_prefix = %service.mount_prefix(),
        "Starting hashfs server"
    );

    server::serve(listener, service, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    let stats = hfs.stats();
    tracing::info!(
        entries = stats.entries,
        translate_hit_rate = stats.hit_rate(),
        resolved_hashed = stats.resolved_hashed,
        resolved_literal = stats.resolved_literal,
        "Server stopped"
    );
    Ok(())
}
