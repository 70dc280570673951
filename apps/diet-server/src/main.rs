use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use diet_tracker::DietTracker;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use url::Url;

mod shutdown;

const MODULE_NAME: &str = "diet_tracker";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Diet Tracker Server - session-scoped meal log with diet summaries
#[derive(Parser)]
#[command(name = "diet-server")]
#[command(about = "Diet Tracker Server - session-scoped meal log with diet summaries")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created inside the loader
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Diet Tracker Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args).await,
    }
}

async fn connect(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConnection> {
    let db_config = config.database.clone().unwrap_or_default();
    let backend = if args.mock {
        "sqlite"
    } else {
        detect_from_dsn(&db_config)?
    };

    let dsn = if args.mock {
        "sqlite::memory:".to_string()
    } else if backend == "sqlite" {
        absolutize_sqlite_dsn(db_config.url.trim(), Path::new(&config.server.home_dir), true)?
    } else {
        db_config.url.trim().to_string()
    };
    let in_memory = dsn == "sqlite::memory:";

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.sqlx_logging(false);
    if in_memory {
        // Every pooled connection would otherwise open its own empty database.
        opts.max_connections(1).min_connections(1);
    } else if let Some(n) = db_config.max_conns {
        opts.max_connections(n);
    }
    if let Some(ms) = db_config.acquire_timeout_ms {
        opts.acquire_timeout(Duration::from_millis(ms));
    }
    if backend == "sqlite" {
        if let Some(ms) = db_config.busy_timeout_ms {
            let busy = Duration::from_millis(u64::from(ms));
            opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));
        }
    }

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {}", dsn))?;
    tracing::info!("Connected DB backend: {}", backend);
    Ok(db)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let db = connect(&config, &args).await?;
    DietTracker::migrate(&db).await?;

    let module_cfg = DietTracker::config_from(config.module_config(MODULE_NAME))?;
    let tracker = DietTracker::new(db, module_cfg);

    let mut router = tracker.router();
    if config.server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_sec,
        )));
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::error!("Shutdown signal handler failed: {}", e);
            }
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    // --mock replaces whatever database is configured
    if let (false, Some(db)) = (args.mock, config.database.as_ref()) {
        detect_from_dsn(db)?;
    }
    DietTracker::config_from(config.module_config(MODULE_NAME))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
