//! Nonce search for genesis blocks.

use polisd_consensus::money::Amount;
use polisd_consensus::{hash256_to_hex, Hash256, Network};
use polisd_log::{log_debug, log_error, log_info};
use polisd_pow::difficulty::{compact_to_target, hash_meets_target};
use polisd_primitives::block::{Block, BlockHeader};
use polisd_primitives::BlockHasher;

use crate::error::ParamsError;
use crate::genesis::build_devnet_genesis;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NonceSearch {
    pub nonce: u32,
    pub hash: Hash256,
    pub attempts: u64,
}

/// Walks the nonce space upward from `header.nonce` and stops at the first
/// header whose hash is at or below `target`. The header keeps the winning
/// nonce. Returns `None` once `u32::MAX` has been tried.
pub fn search_nonce(
    header: &mut BlockHeader,
    target: &Hash256,
    hasher: &dyn BlockHasher,
) -> Option<NonceSearch> {
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let hash = header.hash_with(hasher);
        if hash_meets_target(&hash, target) {
            return Some(NonceSearch {
                nonce: header.nonce,
                hash,
                attempts,
            });
        }
        header.nonce = header.nonce.checked_add(1)?;
    }
}

/// Searches `block` for a nonce meeting `target`, starting from nonce 0.
pub fn mine_block(
    network: Network,
    mut block: Block,
    target: &Hash256,
    hasher: &dyn BlockHasher,
) -> Result<(Block, NonceSearch), ParamsError> {
    block.header.nonce = 0;
    let Some(found) = search_nonce(&mut block.header, target, hasher) else {
        log_error!(
            "{network} genesis search exhausted the nonce space (bits {:#010x})",
            block.header.bits
        );
        return Err(ParamsError::NonceSpaceExhausted {
            network,
            bits: block.header.bits,
        });
    };
    log_debug!(
        "{network} nonce {} found after {} attempts",
        found.nonce,
        found.attempts
    );
    Ok((block, found))
}

/// Mines the devnet genesis on top of `parent`.
///
/// The candidate uses the parent's time plus one and the parent's bits; the
/// target is the expansion of those bits.
pub fn find_devnet_genesis(
    parent: &Block,
    parent_hash: &Hash256,
    devnet_name: &str,
    reward: Amount,
    hasher: &dyn BlockHasher,
) -> Result<(Block, NonceSearch), ParamsError> {
    let bits = parent.header.bits;
    let time = parent.header.time.saturating_add(1);
    let target = compact_to_target(bits)?;
    let candidate = build_devnet_genesis(parent_hash, devnet_name, time, 0, bits, reward)?;
    let (block, found) = mine_block(Network::Devnet, candidate, &target, hasher)?;
    log_info!(
        "{devnet_name} genesis {} (nonce {}, {} attempts)",
        hash256_to_hex(&found.hash),
        found.nonce,
        found.attempts
    );
    Ok((block, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polisd_consensus::ZERO_HASH;

    fn header(nonce: u32) -> BlockHeader {
        BlockHeader {
            version: 1,
            prev_block: ZERO_HASH,
            merkle_root: ZERO_HASH,
            time: 0,
            bits: 0x207f_ffff,
            nonce,
        }
    }

    // Top 32 bits of the hash fall as the nonce grows.
    fn descending(bytes: &[u8; 80]) -> Hash256 {
        let nonce = u32::from_le_bytes([bytes[76], bytes[77], bytes[78], bytes[79]]);
        let mut out = [0xffu8; 32];
        out[28..].copy_from_slice(&(u32::MAX - nonce).to_le_bytes());
        out
    }

    #[test]
    fn search_stops_at_first_match() {
        let mut target = [0xffu8; 32];
        target[28..].copy_from_slice(&(u32::MAX - 5).to_le_bytes());

        let mut h = header(0);
        let found = search_nonce(&mut h, &target, &descending).expect("found");
        assert_eq!(found.nonce, 5);
        assert_eq!(found.attempts, 6);
        assert_eq!(h.nonce, 5);
        assert!(hash_meets_target(&found.hash, &target));
    }

    #[test]
    fn search_gives_up_after_last_nonce() {
        let never = |_: &[u8; 80]| [0xffu8; 32];
        let mut h = header(u32::MAX - 3);
        assert!(search_nonce(&mut h, &ZERO_HASH, &never).is_none());
        assert_eq!(h.nonce, u32::MAX);
    }

    #[test]
    fn devnet_genesis_uses_parent_time_and_bits() {
        let parent = Block {
            header: header(7),
            transactions: Vec::new(),
        };
        let parent_hash = [0x42u8; 32];
        let easy = |_: &[u8; 80]| ZERO_HASH;
        let (block, found) =
            find_devnet_genesis(&parent, &parent_hash, "devnet-t", 1, &easy).expect("mined");
        assert_eq!(found.nonce, 0);
        assert_eq!(block.header.time, parent.header.time + 1);
        assert_eq!(block.header.bits, parent.header.bits);
        assert_eq!(block.header.prev_block, parent_hash);
    }
}
