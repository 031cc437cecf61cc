// Rust guideline compliant 2026-10-19

//! Command-line and environment configuration.
//!
//! Every broker and endpoint option falls back to the environment variable
//! the deployment `.env` files already use.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use domain::PurchaseRequest;
use generator::{AMOUNT_MAX, AMOUNT_MIN, GeneratorConfig, IdScheme};
use poller::{PollerConfig, PollerError};

use crate::adapters::kafka_publisher::{Credentials, KafkaSettings};

/// Identifier scheme selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdSchemeArg {
    /// `TX` + 5 digits.
    Short,
    /// `TX` + 32 hex digits.
    Uuid,
}

impl From<IdSchemeArg> for IdScheme {
    fn from(arg: IdSchemeArg) -> Self {
        match arg {
            IdSchemeArg::Short => Self::Short,
            IdSchemeArg::Uuid => Self::Uuid,
        }
    }
}

/// Simulate online purchases and wait for their fraud verdict.
#[derive(Debug, Parser)]
#[command(name = "fraud_simulator", version)]
pub struct Cli {
    /// Kafka bootstrap servers.
    #[arg(long, env = "KAFKA_BROKER", default_value = "localhost:9092")]
    pub broker: String,

    /// SASL username; SASL_SSL is used only when a password is also set.
    #[arg(long, env = "KAFKA_USERNAME")]
    pub username: Option<String>,

    /// SASL password.
    #[arg(long, env = "KAFKA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Topic receiving the transactions.
    #[arg(long, env = "KAFKA_TOPIC_INPUT", default_value = "transactions_stream")]
    pub topic: String,

    /// Base URL of the verdict service.
    #[arg(long, env = "ENDPOINT", default_value = "http://localhost:8000")]
    pub endpoint: String,

    /// Purchasing user; random `U###` when omitted.
    #[arg(long)]
    pub user_id: Option<String>,

    /// Purchase amount in [1, 500]; random when omitted.
    #[arg(long, value_parser = parse_amount)]
    pub amount: Option<f64>,

    /// Seconds to wait for a verdict.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Seconds between verdict queries.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Seconds a single send may wait for the broker.
    #[arg(long, default_value_t = 10)]
    pub delivery_timeout_secs: u64,

    /// Number of purchases to run concurrently.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// RNG seed for reproducible transactions.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Transaction identifier scheme.
    #[arg(long, value_enum, default_value_t = IdSchemeArg::Short)]
    pub id_scheme: IdSchemeArg,
}

fn parse_amount(raw: &str) -> Result<f64, String> {
    let amount: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if (AMOUNT_MIN..=AMOUNT_MAX).contains(&amount) {
        Ok(amount)
    } else {
        Err(format!("amount must be within [{AMOUNT_MIN}, {AMOUNT_MAX}]"))
    }
}

impl Cli {
    /// Broker connection settings.
    #[must_use]
    pub fn kafka_settings(&self) -> KafkaSettings {
        KafkaSettings {
            brokers: self.broker.clone(),
            topic: self.topic.clone(),
            credentials: Credentials::from_parts(self.username.clone(), self.password.clone()),
            delivery_timeout: Duration::from_secs(self.delivery_timeout_secs),
        }
    }

    /// Overrides supplied on the command line.
    #[must_use]
    pub fn purchase_request(&self) -> PurchaseRequest {
        PurchaseRequest {
            user_id: self.user_id.clone(),
            amount: self.amount,
        }
    }

    /// Generator settings.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        let builder = GeneratorConfig::builder().id_scheme(self.id_scheme.into());
        match self.seed {
            Some(seed) => builder.seed(seed).build(),
            None => builder.build(),
        }
    }

    /// Poller settings. A single request may take up to one interval.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::InvalidConfig`] for a zero interval.
    pub fn poller_config(&self) -> Result<PollerConfig, PollerError> {
        PollerConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .interval(Duration::from_secs(self.interval_secs))
            .attempt_timeout(self.request_timeout())
            .build()
    }

    /// Upper bound on one verdict request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
