//! Block and transaction types, scripts and consensus serialization.

pub mod block;
pub mod encoding;
pub mod hash;
pub mod merkle;
pub mod outpoint;
pub mod script;
pub mod transaction;

pub use block::{Block, BlockHeader, BLOCK_HEADER_SIZE};
pub use hash::{sha256, sha256d, BlockHasher, Sha256dHasher};
pub use merkle::merkle_root;
pub use outpoint::OutPoint;
pub use transaction::{Transaction, TxIn, TxOut};
