//! Monetary units.

pub type Amount = i64;

pub const COIN: Amount = 100_000_000;
pub const CENT: Amount = 1_000_000;

/// Reward paid by every genesis coinbase.
pub const GENESIS_REWARD: Amount = 50 * COIN;
