//! metricwire CLI Client
//!
//! Sends a single `put` or `get` to a metrics server and prints the result.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use metricwire::{ClientConfig, MetricsClient};
use tracing_subscriber::{fmt, EnvFilter};

/// metricwire CLI
#[derive(Parser, Debug)]
#[command(name = "metricwire-cli")]
#[command(about = "CLI for line-protocol metrics servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8888")]
    port: u16,

    /// I/O timeout in milliseconds (omit to block indefinitely)
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit one sample
    Put {
        /// Metric name, e.g. palm.cpu
        metric: String,

        /// Sample value
        value: f64,

        /// Unix timestamp in seconds (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,
    },

    /// Fetch samples for a metric, or `*` for all
    Get {
        /// Metric name or `*`
        metric: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,metricwire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = ClientConfig::builder().host(&args.host).port(args.port);
    if let Some(ms) = args.timeout_ms {
        builder = builder.timeout_ms(ms);
    }
    let config = builder.build();

    tracing::info!("metricwire-cli v{} -> {}", metricwire::VERSION, config.addr());

    let client = match MetricsClient::with_config(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match args.command {
        Commands::Put {
            metric,
            value,
            timestamp,
        } => client.put(&metric, value, timestamp).map(|()| println!("ok")),
        Commands::Get { metric } => client.get(metric.as_str()).map(|series| {
            for (name, samples) in &series {
                for sample in samples {
                    println!("{} {} {}", name, sample.value, sample.timestamp);
                }
            }
        }),
    };

    client.close();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
