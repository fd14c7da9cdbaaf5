//! The per-network parameter set.

use polisd_consensus::{hash256_to_hex, ConsensusParams, Hash256, Network};
use polisd_primitives::block::Block;

use crate::error::ParamsError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    pub height: i32,
    pub hash: Hash256,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CheckpointError {
    Empty,
    NotIncreasing { previous: i32, height: i32 },
    MissingGenesis { first_height: i32 },
    GenesisHash { expected: Hash256, actual: Hash256 },
}

impl std::fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckpointError::Empty => write!(f, "checkpoint table is empty"),
            CheckpointError::NotIncreasing { previous, height } => {
                write!(f, "checkpoint height {height} does not follow {previous}")
            }
            CheckpointError::MissingGenesis { first_height } => {
                write!(f, "first checkpoint is at height {first_height}, not 0")
            }
            CheckpointError::GenesisHash { expected, actual } => write!(
                f,
                "height 0 checkpoint {} is not the genesis hash {}",
                hash256_to_hex(actual),
                hash256_to_hex(expected)
            ),
        }
    }
}

impl std::error::Error for CheckpointError {}

/// Transaction statistics at the last checkpoint, for sync-progress estimates only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainTxData {
    pub time: i64,
    pub tx_count: u64,
    /// Transactions per second after `time`.
    pub tx_rate: f64,
}

impl ChainTxData {
    pub const EMPTY: ChainTxData = ChainTxData {
        time: 0,
        tx_count: 0,
        tx_rate: 0.0,
    };

    pub fn estimated_tx_count(&self, now: i64) -> f64 {
        let elapsed = now.saturating_sub(self.time).max(0) as f64;
        self.tx_count as f64 + elapsed * self.tx_rate
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Base58Prefixes {
    pub pubkey_address: u8,
    pub script_address: u8,
    pub secret_key: u8,
    pub ext_public_key: [u8; 4],
    pub ext_secret_key: [u8; 4],
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NetworkFlags {
    pub mining_requires_peers: bool,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    pub allow_multiple_addresses_from_group: bool,
    pub allow_multiple_ports: bool,
    pub bip9_check_masternodes_upgraded: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DevnetGenesis {
    /// Full devnet name, e.g. `devnet-alpha`.
    pub name: String,
    pub block: Block,
    pub hash: Hash256,
}

#[derive(Clone, Debug)]
pub struct ChainParams {
    pub network: Network,
    pub consensus: ConsensusParams,
    pub message_start: [u8; 4],
    pub default_port: u16,
    pub prune_after_height: u64,
    pub alert_pubkey: Vec<u8>,
    pub genesis: Block,
    pub genesis_hash: Hash256,
    pub devnet_genesis: Option<DevnetGenesis>,
    pub dns_seeds: &'static [&'static str],
    pub fixed_seeds: &'static [&'static str],
    pub base58_prefixes: Base58Prefixes,
    pub ext_coin_type: u32,
    pub flags: NetworkFlags,
    pub pool_min_participants: u32,
    pub pool_max_participants: u32,
    /// Seconds before a fulfilled network request may be repeated.
    pub fulfilled_request_expire_time: i64,
    pub spork_addresses: &'static [&'static str],
    pub min_spork_keys: u32,
    pub checkpoints: Vec<Checkpoint>,
    pub chain_tx_data: ChainTxData,
}

impl ChainParams {
    pub fn network_id(&self) -> &'static str {
        self.network.as_str()
    }

    pub fn devnet_name(&self) -> Option<&str> {
        self.devnet_genesis.as_ref().map(|devnet| devnet.name.as_str())
    }

    pub fn checkpoint_hash(&self, height: i32) -> Option<Hash256> {
        self.checkpoints
            .binary_search_by_key(&height, |checkpoint| checkpoint.height)
            .ok()
            .map(|idx| self.checkpoints[idx].hash)
    }

    pub fn last_checkpoint_at_or_below(&self, height: i32) -> Option<&Checkpoint> {
        let end = self
            .checkpoints
            .partition_point(|checkpoint| checkpoint.height <= height);
        end.checked_sub(1).map(|idx| &self.checkpoints[idx])
    }

    pub fn validate_checkpoints(&self) -> Result<(), CheckpointError> {
        let first = self.checkpoints.first().ok_or(CheckpointError::Empty)?;
        if first.height != 0 {
            return Err(CheckpointError::MissingGenesis {
                first_height: first.height,
            });
        }
        if first.hash != self.genesis_hash {
            return Err(CheckpointError::GenesisHash {
                expected: self.genesis_hash,
                actual: first.hash,
            });
        }
        for pair in self.checkpoints.windows(2) {
            if pair[1].height <= pair[0].height {
                return Err(CheckpointError::NotIncreasing {
                    previous: pair[0].height,
                    height: pair[1].height,
                });
            }
        }
        Ok(())
    }

    /// Structural checks run after construction and after every override.
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.consensus.validate_deployments()?;
        self.consensus.validate_quorums()?;
        self.validate_checkpoints()
            .map_err(|error| ParamsError::Checkpoints {
                network: self.network,
                error,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_tx_estimate_grows_with_time() {
        let data = ChainTxData {
            time: 1_561_487_163,
            tx_count: 900_795,
            tx_rate: 0.1,
        };
        assert_eq!(data.estimated_tx_count(data.time - 100), 900_795.0);
        assert!((data.estimated_tx_count(data.time + 1000) - 900_895.0).abs() < 1e-6);
        assert_eq!(ChainTxData::EMPTY.estimated_tx_count(1_000_000), 0.0);
    }
}
