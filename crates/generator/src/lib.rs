// Rust guideline compliant 2026-10-19

//! Transaction generator -- fabricates one synthetic purchase at a time.
//!
//! Entry points: [`TransactionGenerator::generate`],
//! [`TransactionGenerator::generate_for`]. Configuration via
//! [`GeneratorConfig::builder`].

use domain::{FEATURE_COUNT, PurchaseRequest, Transaction};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use std::cell::RefCell;

/// Lower bound of the `time` draw (seconds offset).
pub const TIME_MIN: f64 = 1.0;
/// Upper bound of the `time` draw (seconds offset).
pub const TIME_MAX: f64 = 172_792.0;
/// Lower bound of a generated `amount`.
pub const AMOUNT_MIN: f64 = 1.0;
/// Upper bound of a generated `amount`.
pub const AMOUNT_MAX: f64 = 500.0;
/// Absolute bound of every feature value.
pub const FEATURE_BOUND: f64 = 3.0;

// ---------------------------------------------------------------------------
// GeneratorConfig + builder
// ---------------------------------------------------------------------------

/// How transaction identifiers are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdScheme {
    /// `TX` followed by five digits. Collisions across calls are possible and
    /// are not corrected.
    #[default]
    Short,
    /// `TX` followed by the 32 hex digits of a random v4 UUID.
    Uuid,
}

/// Runtime configuration for a [`TransactionGenerator`].
///
/// Construct via [`GeneratorConfig::builder`].
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Identifier scheme, [`IdScheme::Short`] unless overridden.
    pub id_scheme: IdScheme,
    /// Optional RNG seed for reproducible output. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`GeneratorConfig`].
///
/// Obtain via [`GeneratorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    id_scheme: IdScheme,
    seed: Option<u64>,
}

impl GeneratorConfig {
    /// Create a builder. Defaults: `id_scheme = Short`, `seed = None`.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }
}

impl GeneratorConfigBuilder {
    /// Override the identifier scheme.
    #[must_use]
    pub fn id_scheme(mut self, id_scheme: IdScheme) -> Self {
        self.id_scheme = id_scheme;
        self
    }

    /// Fix the RNG seed for deterministic output (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Finalize the configuration. Every combination is valid.
    #[must_use]
    pub fn build(self) -> GeneratorConfig {
        GeneratorConfig {
            id_scheme: self.id_scheme,
            seed: self.seed,
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionGenerator
// ---------------------------------------------------------------------------

/// Round to two decimals.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fabricates fully populated synthetic transactions.
///
/// Pure function of its random source: no I/O and no error conditions.
#[derive(Debug)]
pub struct TransactionGenerator {
    config: GeneratorConfig,
    /// Interior mutability required because all public methods take `&self`.
    rng: RefCell<StdRng>,
}

impl TransactionGenerator {
    /// Create a new generator from `config`.
    ///
    /// Seeds the RNG from `config.seed` if set, otherwise from the OS.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng: RefCell::new(rng),
        }
    }

    /// Generate a transaction with every field drawn at random.
    #[must_use]
    pub fn generate(&self) -> Transaction {
        self.generate_for(&PurchaseRequest::default())
    }

    /// Generate a transaction, using `request.user_id` and `request.amount`
    /// verbatim when present.
    ///
    /// Drawn fields: `transaction_id` per the configured [`IdScheme`],
    /// `user_id` as `U` + 3 digits, `time` in `[1, 172_792]` and `amount` in
    /// `[1, 500]` (both rounded to 2 decimals), and 28 features in `[-3, 3]`
    /// at full precision.
    #[must_use]
    pub fn generate_for(&self, request: &PurchaseRequest) -> Transaction {
        let mut rng = self.rng.borrow_mut();

        let transaction_id = match self.config.id_scheme {
            IdScheme::Short => format!("TX{}", rng.random_range(10_000_u32..=99_999)),
            IdScheme::Uuid => {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                format!("TX{}", uuid::Builder::from_random_bytes(bytes).into_uuid().simple())
            }
        };

        // Draw the default user even when overridden so a seed yields the
        // same remaining fields regardless of overrides.
        let drawn_user = format!("U{}", rng.random_range(100_u32..=999));
        let user_id = request.user_id.clone().unwrap_or(drawn_user);

        let time = round_cents(rng.random_range(TIME_MIN..=TIME_MAX));
        let drawn_amount = round_cents(rng.random_range(AMOUNT_MIN..=AMOUNT_MAX));
        let amount = request.amount.unwrap_or(drawn_amount);

        let mut features = [0.0_f64; FEATURE_COUNT];
        for feature in &mut features {
            *feature = rng.random_range(-FEATURE_BOUND..=FEATURE_BOUND);
        }

        tracing::debug!(
            transaction_id = %transaction_id,
            user_id = %user_id,
            amount,
            "generator.transaction.created"
        );

        Transaction {
            transaction_id,
            user_id,
            time,
            amount,
            features,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
