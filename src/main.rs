//! Retail Spend Prediction
//!
//! Serves per-horizon spend forecasts over HTTP and submits records to a
//! running server from the command line.

use clap::{Args, Parser, Subcommand};
use spend_forecast::{
    client::{render, SpendClient},
    config::Config,
    model::ModelRegistry,
    pipeline::PredictionPipeline,
    server::start_server,
    types::CustomerActivity,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spend-forecast")]
#[command(about = "Predict future customer spend over 30/60/90/180 day horizons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the models and serve the prediction API
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Submit one customer record to a running server
    Predict(PredictArgs),
    /// Load every model artifact and list it
    Models,
}

#[derive(Args)]
struct PredictArgs {
    /// Spend in past 30 days
    #[arg(long)]
    spend_30d: f64,
    /// Orders in past 30 days
    #[arg(long)]
    orders_30d: u64,
    /// Spend in past 60 days
    #[arg(long)]
    spend_60d: f64,
    /// Orders in past 60 days
    #[arg(long)]
    orders_60d: u64,
    /// Spend in past 90 days
    #[arg(long)]
    spend_90d: f64,
    /// Orders in past 90 days
    #[arg(long)]
    orders_90d: u64,
    /// Spend in past 180 days
    #[arg(long)]
    spend_180d: f64,
    /// Orders in past 180 days
    #[arg(long)]
    orders_180d: u64,
    /// Days since last purchase
    #[arg(long)]
    recency_days: u64,
    /// Currency symbol used when printing
    #[arg(long, default_value = "₹")]
    currency: String,
}

impl From<&PredictArgs> for CustomerActivity {
    fn from(a: &PredictArgs) -> Self {
        Self {
            spend_past_30d: a.spend_30d,
            orders_past_30d: a.orders_30d,
            spend_past_60d: a.spend_60d,
            orders_past_60d: a.orders_60d,
            spend_past_90d: a.spend_90d,
            orders_past_90d: a.orders_90d,
            spend_past_180d: a.spend_180d,
            orders_past_180d: a.orders_180d,
            recency_days: a.recency_days,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Predict(args) => predict(config, &args).await,
        Commands::Models => list_models(config),
    }
}

async fn serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Loading models from {}", config.models.dir);
    // no partial availability: any load failure aborts before binding
    let registry = match ModelRegistry::load(&config.models.sources()) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            tracing::error!("Model loading failed: {}", e);
            return Err(e.into());
        }
    };

    let pipeline = PredictionPipeline::new(registry);
    start_server(&config.server, pipeline).await?;
    Ok(())
}

async fn predict(config: Config, args: &PredictArgs) -> anyhow::Result<()> {
    let client = SpendClient::from_config(&config.client)?;
    let activity = CustomerActivity::from(args);

    match client.predict(&activity).await {
        Ok(result) => {
            println!("Prediction Successful!\n");
            print!("{}", render(&result, &args.currency));
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Prediction request failed: {}", e);
            anyhow::bail!("API error. Is the prediction server running at {}?", config.client.base_url)
        }
    }
}

fn list_models(config: Config) -> anyhow::Result<()> {
    let registry = ModelRegistry::load(&config.models.sources())?;
    for (horizon, model) in registry.entries() {
        println!("{:<5} {}", horizon.label(), model.name());
    }
    Ok(())
}
