use polisd_consensus::{hash256_to_hex, DeploymentError, Hash256, LlmqError, Network};
use polisd_pow::CompactError;

use crate::chain::CheckpointError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenesisField {
    BlockHash,
    MerkleRoot,
}

impl GenesisField {
    pub fn as_str(self) -> &'static str {
        match self {
            GenesisField::BlockHash => "block hash",
            GenesisField::MerkleRoot => "merkle root",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamsError {
    UnknownNetwork(String),
    GenesisMismatch {
        network: Network,
        field: GenesisField,
        expected: Hash256,
        actual: Hash256,
    },
    NonceSpaceExhausted {
        network: Network,
        bits: u32,
    },
    NotSelected,
    DevnetNotSelected,
    EmptyDevnetName,
    WrongNetwork {
        operation: &'static str,
        network: Network,
    },
    Sealed {
        operation: &'static str,
    },
    InvalidBudgetSchedule {
        budget_start: i32,
        superblock_start: i32,
    },
    InvalidDeployment(DeploymentError),
    Checkpoints {
        network: Network,
        error: CheckpointError,
    },
    Quorum(LlmqError),
    Compact(CompactError),
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::UnknownNetwork(token) => write!(
                f,
                "unknown network '{token}' (expected main, test, dev or regtest)"
            ),
            ParamsError::GenesisMismatch {
                network,
                field,
                expected,
                actual,
            } => write!(
                f,
                "{network} genesis {} mismatch (expected {}, got {})",
                field.as_str(),
                hash256_to_hex(expected),
                hash256_to_hex(actual)
            ),
            ParamsError::NonceSpaceExhausted { network, bits } => write!(
                f,
                "{network} genesis: no nonce meets target {bits:#010x}"
            ),
            ParamsError::NotSelected => write!(f, "no network has been selected"),
            ParamsError::DevnetNotSelected => {
                write!(f, "devnet parameters requested before devnet was selected")
            }
            ParamsError::EmptyDevnetName => write!(f, "devnet name must not be empty"),
            ParamsError::WrongNetwork { operation, network } => {
                write!(f, "{operation} is not allowed on the {network} network")
            }
            ParamsError::Sealed { operation } => {
                write!(f, "{operation} is only allowed during setup")
            }
            ParamsError::InvalidBudgetSchedule {
                budget_start,
                superblock_start,
            } => write!(
                f,
                "superblock start {superblock_start} must be above budget payments start {budget_start}"
            ),
            ParamsError::InvalidDeployment(err) => write!(f, "{err}"),
            ParamsError::Checkpoints { network, error } => {
                write!(f, "{network} checkpoints: {error}")
            }
            ParamsError::Quorum(err) => write!(f, "{err}"),
            ParamsError::Compact(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ParamsError {}

impl From<DeploymentError> for ParamsError {
    fn from(err: DeploymentError) -> Self {
        ParamsError::InvalidDeployment(err)
    }
}

impl From<LlmqError> for ParamsError {
    fn from(err: LlmqError) -> Self {
        ParamsError::Quorum(err)
    }
}

impl From<CompactError> for ParamsError {
    fn from(err: CompactError) -> Self {
        ParamsError::Compact(err)
    }
}
