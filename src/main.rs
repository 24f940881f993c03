use clap::Parser;
use partx_api::{RestApi, SourcingOps};
use partx_core::{Catalog, CatalogConfig};
use partx_similarity::{embed_catalog, HashEmbedder, SimilarityConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Part deduplication and supplier consolidation analytics engine
#[derive(Parser, Debug)]
#[command(name = "partx")]
#[command(about = "Part deduplication and supplier consolidation analytics", long_about = None)]
struct Args {
    /// Directory holding the CSV exports (part_master.csv, ...)
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Neighbors kept per part in the similarity edge set
    #[arg(long, default_value_t = 10)]
    top_k: usize,

    /// Score floor for stored similarity edges, in [0, 100]
    #[arg(long, default_value_t = 75.0)]
    min_score: f64,

    /// Score at or above which two parts are considered duplicates
    #[arg(long, default_value_t = 90.0)]
    duplicate_threshold: f64,

    /// Embedding dimension for the built-in hashing embedder
    #[arg(long, default_value_t = 256)]
    embedding_dim: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting partx v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    let catalog = Arc::new(Catalog::new(CatalogConfig {
        vector_dim: args.embedding_dim,
    }));
    let summary = partx_core::ingest::load_dir(&args.data_dir, &catalog)?;
    info!(
        "Catalog loaded: {} parts, {} suppliers, {} scenarios, {} orders",
        summary.parts, summary.suppliers, summary.scenarios, summary.orders
    );

    let embedder = HashEmbedder::new(args.embedding_dim);
    let embedded = embed_catalog(&catalog, &embedder)?;
    info!("Embedded {} parts at dim {}", embedded, args.embedding_dim);

    let config = SimilarityConfig {
        top_k: args.top_k,
        min_score: args.min_score,
        duplicate_threshold: args.duplicate_threshold,
        ..SimilarityConfig::default()
    };
    let ops = Arc::new(SourcingOps::new(catalog, config));

    if embedded > 0 {
        let report = ops.run_dedup()?;
        info!(
            "Initial duplicate scan: {} duplicate groups covering {} parts",
            report.duplicate_groups().count(),
            report.duplicate_part_count()
        );
    }

    let ops_http = ops.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(ops_http, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("partx started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
