// Rust guideline compliant 2026-10-19

//! Adapters (secondary ports) for the simulator binary.
//!
//! Each sub-module implements one hexagonal port trait defined in the
//! `domain` crate. Adapters are intentionally isolated from generator,
//! poller and simulator logic.

pub mod http_verdict_source;
pub mod kafka_publisher;
