use clap::Parser;
use matchmaker_api::{AuthConfig, RestApi};
use matchmaker_core::FieldSchema;
use matchmaker_storage::StoreManager;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// A small profile matchmaking service over flat JSON files
#[derive(Parser, Debug)]
#[command(name = "matchmaker")]
#[command(about = "A small profile matchmaking service", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./database")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Path to a JSON field schema replacing the built-in profile fields
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
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

    info!("Starting matchmaker v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.port);

    let schema = match &args.schema {
        Some(path) => {
            let data = std::fs::read_to_string(path)?;
            let schema: FieldSchema = serde_json::from_str(&data)?;
            info!("Field schema loaded from {:?}", path);
            schema
        }
        None => FieldSchema::default(),
    };

    let auth = AuthConfig::from_env();
    if auth.skip_authentication {
        info!("Authentication disabled via SKIP_AUTHENTICATION");
    } else if auth.shared_secret.is_none() {
        info!("No SHARED_SECRET configured; protected routes will reject all requests");
    }

    let store = Arc::new(StoreManager::open(&args.data_dir)?);
    info!("Record store initialized");

    let port = args.port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(store, auth, schema, port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("Matchmaker started successfully");
    info!("HTTP API: http://localhost:{}/api", args.port);

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
