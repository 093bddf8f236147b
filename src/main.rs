use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farm_timers::api::{build_router_with_cors, state::AppState};
use farm_timers::config::AppConfig;
use farm_timers::fetch::{FarmClient, FarmSource, FetcherConfig};
use farm_timers::{report_from_value, FarmReport};

#[derive(Parser)]
#[command(name = "farm-timers")]
#[command(about = "Time-until-ready reports for Sunflower Land farms")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level, overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a farm from the community API and print its report
    Farm {
        /// Farm ID
        id: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a report from a saved farm document
    Report {
        /// JSON file holding the API response
        #[arg(long)]
        file: PathBuf,

        /// Evaluate readiness at this instant (epoch ms)
        #[arg(long)]
        now: Option<i64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Port number, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting farm-timers v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Farm { id, json } => {
            let client = FarmClient::new(FetcherConfig::from_api_config(&config.api)?)?;
            let raw = client.fetch_farm(&id).await?;
            let now = chrono::Utc::now().timestamp_millis();
            let report = report_from_value(&raw, now).context("data format mismatch")?;
            print_report(&id, &report, json)?;
        }
        Commands::Report { file, now, json } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let raw: serde_json::Value = serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", file.display()))?;
            let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
            let report = report_from_value(&raw, now).context("data format mismatch")?;
            print_report(&file_label(&file), &report, json)?;
        }
        Commands::Serve { host, port } => {
            let window = config
                .cooldown
                .window()
                .context("cooldown window is not a duration")?;
            let client = FarmClient::new(FetcherConfig::from_api_config(&config.api)?)?;
            let state = AppState::new(Arc::new(client), window);
            let app = build_router_with_cors(state, &config.server.cors_origin);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn print_report(farm_id: &str, report: &FarmReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text(farm_id));
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
