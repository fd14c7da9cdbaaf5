use polisd_consensus::{Hash256, ZERO_HASH};

use crate::hash::sha256d;

/// Bitcoin-style merkle root: odd layers duplicate their last entry.
/// An empty list yields the null hash.
pub fn merkle_root(txids: &[Hash256]) -> Hash256 {
    if txids.is_empty() {
        return ZERO_HASH;
    }
    let mut layer = txids.to_vec();
    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                let mut data = [0u8; 64];
                data[..32].copy_from_slice(left);
                data[32..].copy_from_slice(right);
                sha256d(&data)
            })
            .collect();
    }
    layer[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(byte: u8) -> Hash256 {
        [byte; 32]
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        assert_eq!(merkle_root(&[leaf(9)]), leaf(9));
        assert_eq!(merkle_root(&[]), ZERO_HASH);
    }

    #[test]
    fn pairs_are_double_hashed() {
        let mut data = Vec::new();
        data.extend_from_slice(&leaf(1));
        data.extend_from_slice(&leaf(2));
        assert_eq!(merkle_root(&[leaf(1), leaf(2)]), sha256d(&data));
    }

    #[test]
    fn odd_layers_duplicate_last() {
        let three = merkle_root(&[leaf(1), leaf(2), leaf(3)]);
        let four = merkle_root(&[leaf(1), leaf(2), leaf(3), leaf(3)]);
        assert_eq!(three, four);
        assert_ne!(three, merkle_root(&[leaf(1), leaf(2), leaf(3), leaf(4)]));
    }
}
