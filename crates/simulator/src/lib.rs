// Rust guideline compliant 2026-10-19

//! Simulator component -- runs one simulated purchase end to end:
//! generate a transaction, publish it, then poll for its verdict.
//!
//! Entry points: [`Simulator::purchase`], or [`Simulator::prepare`] followed
//! by [`Simulator::submit`] when the caller wants to show the transaction
//! before it is sent.

use domain::{Ack, PublishError, Publisher, PurchaseRequest, Transaction, VerdictKind, VerdictSource};
use generator::TransactionGenerator;
use poller::{PollOutcome, TimeoutReason, VerdictPoller};

// ---------------------------------------------------------------------------
// SimulationError
// ---------------------------------------------------------------------------

/// Errors that abort a simulated purchase.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The transaction never reached the broker; no poll was attempted.
    #[error("transaction {transaction_id} was not published")]
    Publish {
        /// Key of the transaction that failed.
        transaction_id: String,
        /// The underlying publisher error.
        source: PublishError,
    },
}

// ---------------------------------------------------------------------------
// Outcome + Receipt
// ---------------------------------------------------------------------------

/// Final observable state of a published purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The endpoint flagged the transaction as fraudulent.
    FraudDetected,
    /// The endpoint approved the transaction.
    Approved,
    /// The endpoint answered with a status that is neither fraud nor approval.
    Undetermined {
        /// Raw status received.
        status: String,
    },
    /// No verdict before the timeout. Not a hard failure.
    StillProcessing {
        /// Whether the endpoint answered at all.
        reason: TimeoutReason,
    },
}

impl Outcome {
    /// Map a terminal poll state to a purchase outcome.
    #[must_use]
    pub fn from_poll(outcome: &PollOutcome) -> Self {
        match outcome {
            PollOutcome::Resolved { verdict, .. } => match verdict.kind() {
                VerdictKind::Fraud => Self::FraudDetected,
                VerdictKind::Approved => Self::Approved,
                VerdictKind::Undetermined => Self::Undetermined {
                    status: verdict.status.clone(),
                },
            },
            PollOutcome::TimedOut { .. } => Self::StillProcessing {
                reason: outcome
                    .timeout_reason()
                    .unwrap_or(TimeoutReason::StillProcessing),
            },
        }
    }

    /// User-facing summary line.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::FraudDetected => "FRAUD DETECTED - this transaction is suspicious.",
            Self::Approved => "Transaction approved - purchase successful.",
            Self::Undetermined { .. } => "Transaction in progress or without a definitive result.",
            Self::StillProcessing { reason: TimeoutReason::StillProcessing } => {
                "The transaction is still being processed. Try again later."
            }
            Self::StillProcessing { reason: TimeoutReason::Unreachable } => {
                "The verdict endpoint could not be reached. Try again later."
            }
        }
    }
}

/// Everything observed for one successfully published purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// The transaction as published.
    pub transaction: Transaction,
    /// Broker acknowledgment.
    pub ack: Ack,
    /// Verdict-derived outcome.
    pub outcome: Outcome,
    /// Number of verdict queries issued.
    pub attempts: u32,
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Runs generate -> publish -> poll for one transaction per call.
///
/// Generic over the `Publisher` and `VerdictSource` ports per call, so one
/// simulator can drive any number of concurrent purchases sharing a single
/// broker handle. Holds no mutable state besides the generator's RNG.
#[derive(Debug)]
pub struct Simulator {
    generator: TransactionGenerator,
    poller: VerdictPoller,
}

impl Simulator {
    /// Create a simulator from its two components.
    #[must_use]
    pub fn new(generator: TransactionGenerator, poller: VerdictPoller) -> Self {
        Self { generator, poller }
    }

    /// Generate the transaction for `request` without sending it.
    #[must_use]
    pub fn prepare(&self, request: &PurchaseRequest) -> Transaction {
        self.generator.generate_for(request)
    }

    /// Publish `transaction`, then poll `source` using its `transaction_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Publish`] when publishing fails; the
    /// verdict endpoint is never queried in that case.
    pub async fn submit<P, V>(
        &self,
        publisher: &P,
        source: &V,
        transaction: Transaction,
    ) -> Result<Receipt, SimulationError>
    where
        P: Publisher,
        V: VerdictSource,
    {
        let ack = publisher
            .publish(&transaction)
            .await
            .map_err(|error| SimulationError::Publish {
                transaction_id: transaction.transaction_id.clone(),
                source: error,
            })?;
        tracing::info!(
            transaction_id = %transaction.transaction_id,
            partition = ack.partition,
            offset = ack.offset,
            "simulator.published"
        );

        let polled = self
            .poller
            .poll_outcome(source, &transaction.transaction_id)
            .await;
        let outcome = Outcome::from_poll(&polled);
        tracing::info!(
            transaction_id = %transaction.transaction_id,
            outcome = ?outcome,
            "simulator.completed"
        );

        Ok(Receipt {
            transaction,
            ack,
            outcome,
            attempts: polled.attempts(),
        })
    }

    /// [`prepare`](Self::prepare) then [`submit`](Self::submit).
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Publish`] when publishing fails.
    pub async fn purchase<P, V>(
        &self,
        publisher: &P,
        source: &V,
        request: &PurchaseRequest,
    ) -> Result<Receipt, SimulationError>
    where
        P: Publisher,
        V: VerdictSource,
    {
        let transaction = self.prepare(request);
        self.submit(publisher, source, transaction).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
