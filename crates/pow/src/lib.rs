//! Compact difficulty encoding and proof-of-work target checks.

pub mod difficulty;

pub use difficulty::{check_proof_of_work, compact_to_target, target_to_compact, CompactError};
