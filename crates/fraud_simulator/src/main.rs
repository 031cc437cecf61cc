// Rust guideline compliant 2026-10-19

//! Purchase simulator entry point.
//!
//! Builds the shared Kafka handle and HTTP client once, then runs `--count`
//! simulated purchases concurrently: generate -> publish -> poll for the
//! fraud verdict. Each purchase reports its own outcome; a failure in one
//! never affects the others.
//!
//! # Usage
//!
//! ```text
//! # One purchase with a fixed user and amount
//! RUST_LOG=info cargo run -- --user-id U123 --amount 50
//!
//! # Five concurrent purchases against a remote broker
//! KAFKA_BROKER=kafka:29092 ENDPOINT=http://scoring:8000 cargo run -- --count 5
//! ```

mod adapters;
mod config;

use adapters::http_verdict_source::HttpVerdictSource;
use adapters::kafka_publisher::BrokerHandle;
use anyhow::Context as _;
use clap::Parser as _;
use config::Cli;
use domain::PurchaseRequest;
use generator::TransactionGenerator;
use poller::VerdictPoller;
use simulator::{Outcome, SimulationError, Simulator};
use tracing::Instrument as _;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // One broker handle for the whole process; a failed construction is
    // reported and every publish then fails with `Unavailable`.
    let broker = BrokerHandle::connect(&cli.kafka_settings());
    if let Some(e) = broker.initialization_error() {
        println!("Error initializing the Kafka producer: {e}");
    }

    let source = HttpVerdictSource::new(&cli.endpoint, cli.request_timeout())
        .context("failed to build HTTP client")?;
    let poller = VerdictPoller::new(cli.poller_config().context("invalid polling options")?);
    let simulator = Simulator::new(TransactionGenerator::new(cli.generator_config()), poller);
    let request = cli.purchase_request();

    let purchases = futures::future::join_all((1..=cli.count).map(|n| {
        run_purchase(&simulator, &broker, &source, &request)
            .instrument(tracing::info_span!("purchase", n))
    }));

    // CTRL+C drops the in-flight purchases, which cancels their polls.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("main.shutdown: ctrl_c received");
        }
        _ = purchases => {}
    }

    if let Err(e) = broker.flush() {
        tracing::warn!(error = %e, "main.flush_failed");
    }
    Ok(())
}

/// Run one purchase and print every step for the user.
async fn run_purchase(
    simulator: &Simulator,
    broker: &BrokerHandle,
    source: &HttpVerdictSource,
    request: &PurchaseRequest,
) {
    let transaction = simulator.prepare(request);
    match serde_json::to_string_pretty(&transaction) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "main.render_failed"),
    }

    let id = transaction.transaction_id.clone();
    println!("[{id}] Sending to Kafka and waiting for the prediction result...");
    match simulator.submit(broker, source, transaction).await {
        Ok(receipt) => {
            let marker = match receipt.outcome {
                Outcome::FraudDetected => "!!",
                Outcome::Approved => "ok",
                Outcome::Undetermined { .. } | Outcome::StillProcessing { .. } => "..",
            };
            println!("[{id}] [{marker}] {}", receipt.outcome.message());
        }
        Err(SimulationError::Publish { source, .. }) => {
            tracing::error!(error = %source, "main.purchase_failed");
            println!("[{id}] Error sending the transaction to Kafka: {source}");
        }
    }
}
