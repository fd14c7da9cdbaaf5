//! Per-network chain parameters for the Polis node.
//!
//! Builds the four network profiles (`main`, `test`, `dev`, `regtest`),
//! constructs and checks their genesis blocks, mines the devnet genesis, and
//! owns the registry that selects the active profile for the process.

pub mod chain;
pub mod config;
pub mod error;
pub mod genesis;
pub mod miner;
pub mod networks;
pub mod overrides;
pub mod registry;

pub use chain::{
    Base58Prefixes, ChainParams, ChainTxData, Checkpoint, CheckpointError, DevnetGenesis,
    NetworkFlags,
};
pub use config::{load_conf_file, parse_args, parse_conf, parse_conf_bool, ConfMap, ConfigError, NodeOptions};
pub use error::{GenesisField, ParamsError};
pub use genesis::{build_devnet_genesis, build_genesis_block, devnet_network_name, polis_genesis};
pub use miner::{find_devnet_genesis, search_nonce, NonceSearch};
pub use networks::build_chain_params;
pub use overrides::{BudgetSchedule, DeploymentUpdate, DevnetKnobs};
pub use registry::{ParamsRegistry, Phase};
