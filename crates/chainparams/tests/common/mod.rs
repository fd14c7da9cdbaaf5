#![allow(dead_code)]

use std::sync::Arc;

use polisd_chainparams::ParamsRegistry;
use polisd_consensus::{decode_hex, hash256_from_hex, Hash256};
use polisd_primitives::{sha256d, BlockHasher};

pub const MAIN_GENESIS_HEADER: &str = "010000000000000000000000000000000000000000000000000000000000000000000000fc4b8cb903aed54e11e1ae8a5b7ad097ade34988a84500ad2d80e4d1f5bcc95d2bb73b5af0ff0f1edbff0400";
pub const REGTEST_GENESIS_HEADER: &str = "010000000000000000000000000000000000000000000000000000000000000000000000fc4b8cb903aed54e11e1ae8a5b7ad097ade34988a84500ad2d80e4d1f5bcc95d9a3b3b5af0ff0f1e3c8b0d00";

pub const MAIN_GENESIS_HASH: &str =
    "000009701eb781a8113b1af1d814e2f060f6408a2c990db291bc5108a1345c1e";
pub const REGTEST_GENESIS_HASH: &str =
    "00000f3b4ec57f851b3706c056eda3120875896c9970495ae2efd49b46472a05";
pub const GENESIS_MERKLE_ROOT: &str =
    "5dc9bcf5d1e4802dad0045a88849e3ad97d07a5b8aaee1114ed5ae03b98c4bfc";

/// Header hasher for tests: returns the published X11 hashes of the two fixed
/// genesis headers and double SHA-256 for everything else.
pub fn fixture_hasher() -> Arc<dyn BlockHasher> {
    let known: Vec<([u8; 80], Hash256)> = [
        (MAIN_GENESIS_HEADER, MAIN_GENESIS_HASH),
        (REGTEST_GENESIS_HEADER, REGTEST_GENESIS_HASH),
    ]
    .iter()
    .map(|(header, hash)| {
        let bytes: [u8; 80] = decode_hex(header)
            .expect("header hex")
            .try_into()
            .expect("80 byte header");
        (bytes, hash256_from_hex(hash).expect("hash hex"))
    })
    .collect();

    Arc::new(move |header: &[u8; 80]| {
        known
            .iter()
            .find(|(bytes, _)| bytes == header)
            .map(|(_, hash)| *hash)
            .unwrap_or_else(|| sha256d(header))
    })
}

pub fn registry() -> ParamsRegistry {
    ParamsRegistry::new(fixture_hasher()).expect("registry")
}

pub fn hash(hex: &str) -> Hash256 {
    hash256_from_hex(hex).expect("hash hex")
}
