// Rust guideline compliant 2026-10-19

//! Shared domain types for the purchase simulator.
//!
//! Defines `Transaction`, `Verdict`, `Ack`, the error taxonomy, and the
//! hexagonal port traits `Publisher` and `VerdictSource`. Every other crate in
//! the workspace depends on this one; concrete adapters live in the binary.

use std::collections::BTreeMap;

use serde::ser::SerializeMap as _;
use serde::{Deserialize, Serialize, Serializer};

/// Number of anonymized features carried by every transaction (`V1`..`V28`).
pub const FEATURE_COUNT: usize = 28;

/// Verdict status reported for a transaction flagged as fraudulent.
pub const FRAUD_STATUS: &str = "fraude";

/// Verdict status reported for an approved transaction.
pub const APPROVED_STATUS: &str = "aprobada";

/// Wire name of the feature at zero-based `index` (`0` -> `"V1"`).
#[must_use]
pub fn feature_name(index: usize) -> String {
    format!("V{}", index + 1)
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A synthetic purchase transaction.
///
/// Fully populated at construction and never mutated afterwards. Serializes to
/// a flat document: `transaction_id`, `user_id`, `time`, `amount`, then
/// `V1`..`V28`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    /// Correlation key shared by the published message and the verdict query.
    pub transaction_id: String,
    /// Purchasing actor.
    pub user_id: String,
    /// Seconds offset, range `[1, 172_792]`.
    pub time: f64,
    /// Purchase amount in currency units.
    pub amount: f64,
    /// Anonymized feature vector, each value in `[-3, 3]`.
    pub features: [f64; FEATURE_COUNT],
}

impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + FEATURE_COUNT))?;
        map.serialize_entry("transaction_id", &self.transaction_id)?;
        map.serialize_entry("user_id", &self.user_id)?;
        map.serialize_entry("time", &self.time)?;
        map.serialize_entry("amount", &self.amount)?;
        for (index, value) in self.features.iter().enumerate() {
            map.serialize_entry(&feature_name(index), value)?;
        }
        map.end()
    }
}

/// Flat wire shape; every key besides the four named fields lands in `extra`.
///
/// `V1`..`V28` are picked out on conversion. Any other extra key (a label
/// column, producer metadata) is ignored whatever its type.
#[derive(Deserialize)]
struct RawTransaction {
    transaction_id: String,
    user_id: String,
    time: f64,
    amount: f64,
    #[serde(flatten)]
    extra: BTreeMap<String, ExtraValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtraValue {
    Number(f64),
    Other(#[allow(dead_code, reason = "only the variant matters")] serde::de::IgnoredAny),
}

/// Errors raised when a decoded document does not describe a full transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionFormatError {
    /// One of `V1`..`V28` is absent.
    #[error("missing feature {name}")]
    MissingFeature {
        /// Wire name of the absent feature.
        name: String,
    },
    /// One of `V1`..`V28` is present but not a number.
    #[error("feature {name} is not a number")]
    NonNumericFeature {
        /// Wire name of the offending feature.
        name: String,
    },
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = TransactionFormatError;

    fn try_from(mut raw: RawTransaction) -> Result<Self, Self::Error> {
        let mut features = [0.0_f64; FEATURE_COUNT];
        for (index, slot) in features.iter_mut().enumerate() {
            let name = feature_name(index);
            *slot = match raw.extra.remove(&name) {
                Some(ExtraValue::Number(value)) => value,
                Some(ExtraValue::Other(_)) => {
                    return Err(TransactionFormatError::NonNumericFeature { name });
                }
                None => return Err(TransactionFormatError::MissingFeature { name }),
            };
        }
        Ok(Self {
            transaction_id: raw.transaction_id,
            user_id: raw.user_id,
            time: raw.time,
            amount: raw.amount,
            features,
        })
    }
}

/// Caller-supplied overrides for a generated transaction.
///
/// `None` fields are drawn by the generator; `Some` values are used verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseRequest {
    /// Purchasing actor to use instead of a random one.
    pub user_id: Option<String>,
    /// Purchase amount to use instead of a random one.
    pub amount: Option<f64>,
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Scoring outcome read from the external verdict endpoint.
///
/// Only `status` is interpreted; other response fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Raw status string, e.g. `"fraude"` or `"aprobada"`.
    pub status: String,
}

/// Tri-state classification of a [`Verdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictKind {
    /// The transaction was rejected as fraudulent.
    Fraud,
    /// The transaction was approved.
    Approved,
    /// Any other status: still in progress or inconclusive.
    Undetermined,
}

impl Verdict {
    /// Build a verdict from a raw status string.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into() }
    }

    /// Classify the raw status.
    #[must_use]
    pub fn kind(&self) -> VerdictKind {
        match self.status.as_str() {
            FRAUD_STATUS => VerdictKind::Fraud,
            APPROVED_STATUS => VerdictKind::Approved,
            _ => VerdictKind::Undetermined,
        }
    }
}

/// Broker acknowledgment for one published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Partition the message was written to.
    pub partition: i32,
    /// Offset assigned by the broker.
    pub offset: i64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The messaging client could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("messaging client initialization failed: {reason}")]
pub struct InitializationError {
    /// Human-readable description.
    pub reason: String,
}

/// Errors from the Publisher hexagonal port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The transaction could not be serialized.
    #[error("failed to encode transaction {transaction_id}: {reason}")]
    Encode {
        /// Key of the transaction that failed.
        transaction_id: String,
        /// Human-readable description.
        reason: String,
    },
    /// The broker rejected the message or the send timed out.
    #[error("delivery of transaction {transaction_id} failed: {reason}")]
    Delivery {
        /// Key of the transaction that failed.
        transaction_id: String,
        /// Human-readable description.
        reason: String,
    },
    /// No messaging client is available (initialization failed earlier).
    #[error("publisher unavailable: {reason}")]
    Unavailable {
        /// Human-readable description.
        reason: String,
    },
}

/// Errors from a single verdict query.
///
/// The poller treats every variant as "not yet ready" and retries; the
/// distinction only survives in the tagged timeout outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The endpoint answered with a non-success status.
    #[error("verdict not ready (HTTP {status})")]
    NotReady {
        /// HTTP status code received.
        status: u16,
    },
    /// The endpoint could not be reached.
    #[error("transport error: {reason}")]
    Transport {
        /// Human-readable description.
        reason: String,
    },
    /// The endpoint answered with success but the body is not a verdict.
    #[error("malformed verdict: {reason}")]
    Decode {
        /// Human-readable description.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Hexagonal port: hand one transaction to the message broker.
///
/// Implementations must not return before the broker acknowledged the
/// message or the send failed. Exactly one message is enqueued on success,
/// zero on failure; no retries happen at this layer.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait Publisher {
    /// Publish `transaction`, keyed by its `transaction_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when encoding or delivery fails, or when no
    /// client is available.
    async fn publish(&self, transaction: &Transaction) -> Result<Ack, PublishError>;
}

/// Hexagonal port: one read-only verdict query keyed by transaction ID.
///
/// Queries must be idempotent; the poller repeats them freely.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait VerdictSource {
    /// Query the verdict for `transaction_id` once.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the verdict is not available yet, the
    /// endpoint is unreachable, or the body cannot be decoded.
    async fn fetch(&self, transaction_id: &str) -> Result<Verdict, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn make_tx() -> Transaction {
        let mut features = [0.0_f64; FEATURE_COUNT];
        for (i, f) in features.iter_mut().enumerate() {
            *f = -1.5 + f64::from(u8::try_from(i).unwrap()) * 0.1;
        }
        Transaction {
            transaction_id: "TX12345".to_owned(),
            user_id: "U123".to_owned(),
            time: 4_242.42,
            amount: 50.0,
            features,
        }
    }

    #[test]
    fn feature_names_are_one_based() {
        assert_eq!(feature_name(0), "V1");
        assert_eq!(feature_name(27), "V28");
    }

    #[test]
    fn serializes_as_flat_document_in_field_order() {
        let json = serde_json::to_string(&make_tx()).unwrap();
        assert!(json.starts_with(r#"{"transaction_id":"TX12345","user_id":"U123","time":4242.42,"amount":50.0,"V1":"#));
        assert!(json.contains(r#""V28":"#));
        assert!(!json.contains("features"), "features must be flattened: {json}");
    }

    #[test]
    fn decoding_reproduces_every_field() {
        let tx = make_tx();
        let json = serde_json::to_string(&tx).unwrap();
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn decoding_rejects_missing_feature() {
        let mut value = serde_json::to_value(make_tx()).unwrap();
        value.as_object_mut().unwrap().remove("V17");
        let err = serde_json::from_value::<Transaction>(value).unwrap_err();
        assert!(err.to_string().contains("missing feature V17"), "{err}");
    }

    #[test]
    fn decoding_ignores_unrelated_fields() {
        let tx = make_tx();
        let mut value = serde_json::to_value(&tx).unwrap();
        let object = value.as_object_mut().unwrap();
        object.insert("source".to_owned(), serde_json::json!("web"));
        object.insert("Class".to_owned(), serde_json::json!(0));
        object.insert("tags".to_owned(), serde_json::json!(["a", "b"]));

        let decoded: Transaction = serde_json::from_value(value).unwrap();

        assert_eq!(decoded, tx);
    }

    #[test]
    fn decoding_rejects_non_numeric_feature() {
        let mut value = serde_json::to_value(make_tx()).unwrap();
        value.as_object_mut().unwrap().insert("V3".to_owned(), serde_json::json!("high"));
        let err = serde_json::from_value::<Transaction>(value).unwrap_err();
        assert!(err.to_string().contains("feature V3 is not a number"), "{err}");
    }

    #[test]
    fn verdict_kind_is_tri_state() {
        assert_eq!(Verdict::new("fraude").kind(), VerdictKind::Fraud);
        assert_eq!(Verdict::new("aprobada").kind(), VerdictKind::Approved);
        assert_eq!(Verdict::new("pendiente").kind(), VerdictKind::Undetermined);
        assert_eq!(Verdict::new("").kind(), VerdictKind::Undetermined);
    }

    #[test]
    fn verdict_ignores_unknown_fields() {
        let verdict: Verdict =
            serde_json::from_str(r#"{"transaction_id":"TX1","status":"aprobada","score":0.02}"#)
                .unwrap();
        assert_eq!(verdict, Verdict::new("aprobada"));
    }

    #[test]
    fn error_messages() {
        let init = InitializationError { reason: "bad broker".to_owned() };
        assert_eq!(init.to_string(), "messaging client initialization failed: bad broker");

        let publish = PublishError::Delivery {
            transaction_id: "TX1".to_owned(),
            reason: "timeout".to_owned(),
        };
        assert_eq!(publish.to_string(), "delivery of transaction TX1 failed: timeout");

        assert_eq!(
            QueryError::NotReady { status: 404 }.to_string(),
            "verdict not ready (HTTP 404)"
        );
    }

    /// Minimal adapters for both ports compile and behave as written.
    #[tokio::test]
    async fn port_trait_struct_impl() {
        struct Recording {
            published: RefCell<Vec<String>>,
        }

        impl Publisher for Recording {
            async fn publish(&self, transaction: &Transaction) -> Result<Ack, PublishError> {
                let mut published = self.published.borrow_mut();
                published.push(transaction.transaction_id.clone());
                Ok(Ack { partition: 0, offset: i64::try_from(published.len()).unwrap() - 1 })
            }
        }

        impl VerdictSource for Recording {
            async fn fetch(&self, transaction_id: &str) -> Result<Verdict, QueryError> {
                if self.published.borrow().iter().any(|id| id == transaction_id) {
                    Ok(Verdict::new(APPROVED_STATUS))
                } else {
                    Err(QueryError::NotReady { status: 404 })
                }
            }
        }

        let ports = Recording { published: RefCell::new(vec![]) };
        let tx = make_tx();
        assert_eq!(
            ports.fetch(&tx.transaction_id).await,
            Err(QueryError::NotReady { status: 404 })
        );
        let ack = ports.publish(&tx).await.unwrap();
        assert_eq!(ack, Ack { partition: 0, offset: 0 });
        assert_eq!(ports.fetch(&tx.transaction_id).await.unwrap().kind(), VerdictKind::Approved);
    }
}
