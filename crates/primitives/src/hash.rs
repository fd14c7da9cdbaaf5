use polisd_consensus::Hash256;
use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> Hash256 {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

/// Proof-of-work hash of a serialized 80-byte block header.
///
/// The production chain hashes headers with X11; that implementation lives
/// outside this workspace and is handed in through this trait. Transaction
/// ids and merkle roots are always double SHA-256.
pub trait BlockHasher: Send + Sync {
    fn hash_header(&self, header: &[u8; 80]) -> Hash256;
}

/// Double SHA-256 header hashing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256dHasher;

impl BlockHasher for Sha256dHasher {
    fn hash_header(&self, header: &[u8; 80]) -> Hash256 {
        sha256d(header)
    }
}

impl<F> BlockHasher for F
where
    F: Fn(&[u8; 80]) -> Hash256 + Send + Sync,
{
    fn hash_header(&self, header: &[u8; 80]) -> Hash256 {
        self(header)
    }
}
