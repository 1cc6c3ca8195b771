//! Bucketcast - S3 upload notifications over SNS
//!
//! Runs as an AWS Lambda function subscribed to a bucket's object-created
//! events, or forwards a stored event document from the command line.

mod handler;
mod logging;

use bucketcast_core::config::ForwarderConfig;
use bucketcast_forwarder::{LogPublisher, MessagePublisher, NotificationForwarder, SnsPublisher};
use clap::{Parser, Subcommand};
use lambda_runtime::{run, service_fn};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "bucketcast")]
#[command(author = "Bucketcast Team")]
#[command(version = bucketcast_core::VERSION)]
#[command(about = "Forward S3 object-created events to an SNS topic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Destination topic ARN (overrides SNS_TOPIC)
    #[arg(long, global = true)]
    topic: Option<String>,

    /// AWS region for the SNS client
    #[arg(long, global = true)]
    region: Option<String>,

    /// SNS endpoint override
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve Lambda invocations (default)
    Lambda,

    /// Forward an S3 event document once
    Forward {
        /// Path to the event JSON, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: String,

        /// Log messages instead of publishing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ForwarderConfig::from_file(path)?,
        None => ForwarderConfig::default(),
    };
    config.apply_env();

    // Override with CLI args
    if let Some(topic) = cli.topic {
        config.topic.arn = Some(topic);
    }
    if let Some(region) = cli.region {
        config.topic.region = Some(region);
    }
    if let Some(endpoint) = cli.endpoint_url {
        config.topic.endpoint_url = Some(endpoint);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    logging::init(&config.logging);

    match cli.command.unwrap_or(Commands::Lambda) {
        Commands::Version => {
            println!("bucketcast {}", bucketcast_core::VERSION);
        }
        Commands::Lambda => run_lambda(config).await?,
        Commands::Forward { event, dry_run } => forward_once(config, &event, dry_run).await?,
    }

    Ok(())
}

async fn run_lambda(config: ForwarderConfig) -> anyhow::Result<()> {
    config.validate()?;
    let topic = config.topic_arn()?;
    info!("Starting Lambda runtime, publishing to {}", topic);

    let publisher = SnsPublisher::connect(&config.topic, &topic).await;
    let forwarder = NotificationForwarder::new(topic, publisher);

    run(service_fn(|event| handler::function_handler(event, &forwarder)))
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

async fn forward_once(config: ForwarderConfig, source: &str, dry_run: bool) -> anyhow::Result<()> {
    config.validate()?;
    let topic = config.topic_arn()?;
    let batch = handler::read_event(source)?;

    let publisher: Box<dyn MessagePublisher> = if dry_run {
        Box::new(LogPublisher::new())
    } else {
        Box::new(SnsPublisher::connect(&config.topic, &topic).await)
    };

    let forwarder = NotificationForwarder::new(topic, publisher);
    let report = forwarder.process(&batch).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
