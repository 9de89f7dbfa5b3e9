use clap::{Parser, Subcommand};
use trend_forecast_core::config_loader::DEFAULT_CONFIG_PATH;
use trend_forecast_core::ConfigLoader;

mod commands;
mod context;

use context::AppContext;

#[derive(Parser)]
#[command(name = "trend-forecast")]
#[command(about = "Linear trend forecasting over dated observations", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH, env = "TREND_FORECAST_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Server address (defaults to server.host:server.port from config)
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Add a single observation
    Add {
        /// Observation date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Observed value
        #[arg(long, allow_hyphen_values = true)]
        value: f64,
    },
    /// List stored observations sorted by date
    List {
        /// Write the observations as `date,actual` CSV instead of printing JSON
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Import observations from a `date,actual` CSV file
    Import {
        /// CSV file path
        #[arg(short, long)]
        file: String,
    },
    /// Fit a trend model on the stored observations
    Train,
    /// Forecast the 30 days after the latest observation
    Predict {
        /// Write the forecast as CSV instead of printing JSON
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the persisted model and whether it is stale
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load_from(&cli.config)?;
    let ctx = AppContext::open(config).await?;

    let result = match cli.command {
        Commands::Serve { addr } => commands::run_serve(&ctx, addr.as_deref()).await,
        Commands::Add { date, value } => commands::run_add(&ctx, &date, value).await,
        Commands::List { output } => commands::run_list(&ctx, output.as_deref()).await,
        Commands::Import { file } => commands::run_import(&ctx, &file).await.map(|count| {
            println!("Imported {count} observations");
        }),
        Commands::Train => commands::run_train(&ctx).await.map(|_| ()),
        Commands::Predict { output } => commands::run_predict(&ctx, output.as_deref()).await,
        Commands::Status => commands::run_status(&ctx).await,
    };

    ctx.close().await;
    result
}
