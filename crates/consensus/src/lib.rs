//! Consensus constants, soft-fork deployments, quorum catalog, and per-network parameters.

pub mod deployments;
pub mod hash;
pub mod llmq;
pub mod money;
pub mod params;

pub use deployments::{Deployment, DeploymentError, DeploymentPos, MAX_VERSION_BITS_DEPLOYMENTS};
pub use hash::{decode_hex, hash256_from_hex, hash256_to_hex, Hash256, HexError, ZERO_HASH};
pub use llmq::{LlmqError, LlmqParams, LlmqType};
pub use params::{consensus_params, ConsensusParams, Network, ALL_NETWORKS, NEVER_HEIGHT};
