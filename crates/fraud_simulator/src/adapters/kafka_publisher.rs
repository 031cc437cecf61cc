// Rust guideline compliant 2026-10-19

//! Kafka adapter for the `Publisher` port.
//!
//! Encodes each transaction as a flat JSON document and sends it to the input
//! topic keyed by `transaction_id`. `publish` awaits the broker's delivery
//! report, so a returned `Ack` means the message is stored.
//!
//! The producer handle is created once at startup and shared by every
//! purchase; `FutureProducer` is internally reference counted and safe for
//! concurrent use.

use std::fmt;
use std::time::Duration;

use domain::{Ack, InitializationError, PublishError, Publisher, Transaction};
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaResult;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer as _};
use rdkafka::util::Timeout;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// SASL credentials. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// SASL username.
    pub username: String,
    /// SASL password.
    pub password: String,
}

impl Credentials {
    /// Pair up optional parts; `None` unless both are present and non-empty.
    #[must_use]
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Self { username, password })
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transport security used to reach the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityMode {
    /// No authentication, no encryption (local development).
    Plaintext,
    /// SASL `PLAIN` over TLS.
    SaslSsl,
}

impl SecurityMode {
    /// Value of librdkafka's `security.protocol` property.
    #[must_use]
    pub fn protocol(self) -> &'static str {
        match self {
            Self::Plaintext => "PLAINTEXT",
            Self::SaslSsl => "SASL_SSL",
        }
    }
}

/// Connection settings for [`KafkaPublisher`].
#[derive(Debug, Clone)]
pub struct KafkaSettings {
    /// Bootstrap broker list, e.g. `localhost:9092`.
    pub brokers: String,
    /// Topic receiving the transactions.
    pub topic: String,
    /// Present only when both username and password were configured.
    pub credentials: Option<Credentials>,
    /// How long a send may wait for its delivery report.
    pub delivery_timeout: Duration,
}

impl KafkaSettings {
    /// Security mode implied by the presence of credentials.
    #[must_use]
    pub fn security_mode(&self) -> SecurityMode {
        if self.credentials.is_some() {
            SecurityMode::SaslSsl
        } else {
            SecurityMode::Plaintext
        }
    }

    /// librdkafka client configuration for these settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("security.protocol", self.security_mode().protocol())
            .set("message.timeout.ms", self.delivery_timeout.as_millis().to_string());
        if let Some(credentials) = &self.credentials {
            config
                .set("sasl.mechanisms", "PLAIN")
                .set("sasl.username", &credentials.username)
                .set("sasl.password", &credentials.password);
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode `transaction` as the message value.
///
/// # Errors
///
/// Returns [`PublishError::Encode`] when serialization fails.
pub fn encode_message(transaction: &Transaction) -> Result<String, PublishError> {
    serde_json::to_string(transaction).map_err(|e| PublishError::Encode {
        transaction_id: transaction.transaction_id.clone(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// KafkaPublisher
// ---------------------------------------------------------------------------

/// `Publisher` adapter backed by an rdkafka `FutureProducer`.
#[derive(Clone)]
pub struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
    delivery_timeout: Duration,
}

impl fmt::Debug for KafkaPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaPublisher")
            .field("topic", &self.topic)
            .field("delivery_timeout", &self.delivery_timeout)
            .finish_non_exhaustive()
    }
}

impl KafkaPublisher {
    /// Build the producer. Does not contact the broker.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError`] when librdkafka rejects the configuration.
    pub fn connect(settings: &KafkaSettings) -> Result<Self, InitializationError> {
        let producer: FutureProducer = settings
            .client_config()
            .create()
            .map_err(|e| InitializationError { reason: e.to_string() })?;
        tracing::info!(
            brokers = %settings.brokers,
            topic = %settings.topic,
            security = settings.security_mode().protocol(),
            "kafka_publisher.initialized"
        );
        Ok(Self {
            producer,
            topic: settings.topic.clone(),
            delivery_timeout: settings.delivery_timeout,
        })
    }

    /// Wait for every in-flight message to be delivered or to fail.
    ///
    /// # Errors
    ///
    /// Returns the librdkafka error when messages remain after the timeout.
    pub fn flush(&self) -> KafkaResult<()> {
        self.producer.flush(Timeout::After(self.delivery_timeout))
    }
}

impl Publisher for KafkaPublisher {
    async fn publish(&self, transaction: &Transaction) -> Result<Ack, PublishError> {
        let payload = encode_message(transaction)?;
        let record = FutureRecord::to(&self.topic)
            .key(transaction.transaction_id.as_str())
            .payload(payload.as_str());

        match self.producer.send(record, Timeout::After(self.delivery_timeout)).await {
            Ok((partition, offset)) => {
                tracing::debug!(
                    transaction_id = %transaction.transaction_id,
                    partition,
                    offset,
                    "kafka_publisher.delivered"
                );
                Ok(Ack { partition, offset })
            }
            Err((error, _message)) => {
                tracing::error!(
                    transaction_id = %transaction.transaction_id,
                    error = %error,
                    "kafka_publisher.delivery_failed"
                );
                Err(PublishError::Delivery {
                    transaction_id: transaction.transaction_id.clone(),
                    reason: error.to_string(),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// BrokerHandle
// ---------------------------------------------------------------------------

/// Process-wide broker handle that survives a failed initialization.
///
/// When the producer cannot be built the process keeps running; every
/// publish then fails with [`PublishError::Unavailable`].
#[derive(Debug)]
pub enum BrokerHandle {
    /// Producer built successfully.
    Connected(KafkaPublisher),
    /// Producer construction failed with this error.
    Disconnected(InitializationError),
}

impl BrokerHandle {
    /// Build the producer, logging and retaining the error on failure.
    #[must_use]
    pub fn connect(settings: &KafkaSettings) -> Self {
        match KafkaPublisher::connect(settings) {
            Ok(publisher) => Self::Connected(publisher),
            Err(e) => {
                tracing::error!(error = %e, "kafka_publisher.initialization_failed");
                Self::Disconnected(e)
            }
        }
    }

    /// Initialization error, if any.
    #[must_use]
    pub fn initialization_error(&self) -> Option<&InitializationError> {
        match self {
            Self::Connected(_) => None,
            Self::Disconnected(e) => Some(e),
        }
    }

    /// Flush pending messages before exit; no-op when disconnected.
    ///
    /// # Errors
    ///
    /// Propagates [`KafkaPublisher::flush`] failures.
    pub fn flush(&self) -> KafkaResult<()> {
        match self {
            Self::Connected(publisher) => publisher.flush(),
            Self::Disconnected(_) => Ok(()),
        }
    }
}

impl Publisher for BrokerHandle {
    async fn publish(&self, transaction: &Transaction) -> Result<Ack, PublishError> {
        match self {
            Self::Connected(publisher) => publisher.publish(transaction).await,
            Self::Disconnected(e) => Err(PublishError::Unavailable {
                reason: e.reason.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{
        BrokerHandle, Credentials, KafkaPublisher, KafkaSettings, SecurityMode, encode_message,
    };
    use domain::{FEATURE_COUNT, InitializationError, PublishError, Publisher as _, Transaction};
    use std::time::Duration;

    fn make_tx() -> Transaction {
        let mut features = [0.0_f64; FEATURE_COUNT];
        for (i, f) in features.iter_mut().enumerate() {
            *f = 0.123_456_789 * f64::from(u8::try_from(i).unwrap()) - 1.7;
        }
        Transaction {
            transaction_id: "TX24680".to_owned(),
            user_id: "U321".to_owned(),
            time: 86_400.55,
            amount: 123.45,
            features,
        }
    }

    fn settings(credentials: Option<Credentials>) -> KafkaSettings {
        KafkaSettings {
            brokers: "localhost:9092".to_owned(),
            topic: "transactions_stream".to_owned(),
            credentials,
            delivery_timeout: Duration::from_secs(5),
        }
    }

    // ------------------------------------------------------------------
    // Security mode
    // ------------------------------------------------------------------

    #[test]
    fn credentials_require_both_parts() {
        assert!(Credentials::from_parts(Some("u".to_owned()), Some("p".to_owned())).is_some());
        assert!(Credentials::from_parts(Some("u".to_owned()), None).is_none());
        assert!(Credentials::from_parts(None, Some("p".to_owned())).is_none());
        assert!(Credentials::from_parts(Some(String::new()), Some("p".to_owned())).is_none());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials::from_parts(Some("alice".to_owned()), Some("s3cret".to_owned()))
            .unwrap();
        let printed = format!("{credentials:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("s3cret"), "{printed}");
    }

    #[test]
    fn plaintext_without_credentials() {
        let settings = settings(None);
        assert_eq!(settings.security_mode(), SecurityMode::Plaintext);
        let config = settings.client_config();
        assert_eq!(config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(config.get("security.protocol"), Some("PLAINTEXT"));
        assert_eq!(config.get("message.timeout.ms"), Some("5000"));
        assert_eq!(config.get("sasl.username"), None);
    }

    #[test]
    fn sasl_ssl_with_credentials() {
        let settings = settings(Credentials::from_parts(
            Some("alice".to_owned()),
            Some("s3cret".to_owned()),
        ));
        assert_eq!(settings.security_mode(), SecurityMode::SaslSsl);
        let config = settings.client_config();
        assert_eq!(config.get("security.protocol"), Some("SASL_SSL"));
        assert_eq!(config.get("sasl.mechanisms"), Some("PLAIN"));
        assert_eq!(config.get("sasl.username"), Some("alice"));
        assert_eq!(config.get("sasl.password"), Some("s3cret"));
    }

    // ------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------

    #[test]
    fn encoded_message_round_trips() {
        let tx = make_tx();
        let payload = encode_message(&tx).unwrap();
        let decoded: Transaction = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn encoded_message_is_flat_key_value_document() {
        let payload = encode_message(&make_tx()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4 + FEATURE_COUNT);
        assert_eq!(object["transaction_id"], "TX24680");
        assert!(object.values().all(|v| !v.is_object() && !v.is_array()));
    }

    // ------------------------------------------------------------------
    // Publisher
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn disconnected_handle_reports_unavailable() {
        let handle = BrokerHandle::Disconnected(InitializationError {
            reason: "bad config".to_owned(),
        });
        let result = handle.publish(&make_tx()).await;
        assert_eq!(
            result,
            Err(PublishError::Unavailable { reason: "bad config".to_owned() })
        );
        assert!(handle.initialization_error().is_some());
        assert!(handle.flush().is_ok());
    }

    #[tokio::test]
    async fn delivered_message_is_keyed_by_transaction_id() {
        use rdkafka::config::ClientConfig;
        use rdkafka::consumer::{BaseConsumer, Consumer as _};
        use rdkafka::message::Message as _;
        use rdkafka::mocking::MockCluster;
        use rdkafka::{Offset, TopicPartitionList};

        let cluster = MockCluster::new(1).unwrap();
        cluster.create_topic("transactions_stream", 1, 1).unwrap();
        let settings = KafkaSettings {
            brokers: cluster.bootstrap_servers(),
            ..settings(None)
        };
        let publisher = KafkaPublisher::connect(&settings).unwrap();
        let tx = make_tx();

        let ack = tokio::time::timeout(Duration::from_secs(30), publisher.publish(&tx))
            .await
            .expect("delivery report must arrive")
            .unwrap();
        assert_eq!(ack.partition, 0);

        let consumer: BaseConsumer = ClientConfig::new()
            .set("bootstrap.servers", cluster.bootstrap_servers())
            .set("group.id", "delivery-check")
            .create()
            .unwrap();
        let mut assignment = TopicPartitionList::new();
        assignment
            .add_partition_offset("transactions_stream", 0, Offset::Offset(ack.offset))
            .unwrap();
        consumer.assign(&assignment).unwrap();

        let message = (0..60)
            .find_map(|_| consumer.poll(Duration::from_millis(500)))
            .expect("published message must be readable")
            .unwrap();
        assert_eq!(message.key(), Some(&b"TX24680"[..]));
        let decoded: Transaction = serde_json::from_slice(message.payload().unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[tokio::test]
    async fn unreachable_broker_fails_delivery() {
        let settings = KafkaSettings {
            brokers: "127.0.0.1:1".to_owned(),
            delivery_timeout: Duration::from_millis(200),
            ..settings(None)
        };
        let publisher = KafkaPublisher::connect(&settings).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(30), publisher.publish(&make_tx()))
            .await
            .expect("delivery report must arrive");
        assert!(
            matches!(&result, Err(PublishError::Delivery { transaction_id, .. }) if transaction_id == "TX24680"),
            "unexpected result: {result:?}"
        );
    }
}
