//! Difficulty and compact target utilities.

use polisd_consensus::Hash256;
use primitive_types::U256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactError {
    Negative,
    Overflow,
    Zero,
    AboveLimit,
}

impl std::fmt::Display for CompactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompactError::Negative => write!(f, "compact target has negative sign bit"),
            CompactError::Overflow => write!(f, "compact target overflows 256-bit range"),
            CompactError::Zero => write!(f, "compact target is zero"),
            CompactError::AboveLimit => write!(f, "compact target is easier than the pow limit"),
        }
    }
}

impl std::error::Error for CompactError {}

pub fn compact_to_u256(bits: u32) -> Result<U256, CompactError> {
    let size = bits >> 24;
    let mut word = bits & 0x007f_ffff;

    if bits & 0x0080_0000 != 0 && word != 0 {
        return Err(CompactError::Negative);
    }

    let value = if size <= 3 {
        word >>= 8 * (3 - size);
        U256::from(word)
    } else {
        if word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32))
        {
            return Err(CompactError::Overflow);
        }
        U256::from(word) << (8 * (size - 3))
    };

    Ok(value)
}

pub fn u256_to_compact(value: U256) -> u32 {
    if value.is_zero() {
        return 0;
    }

    let mut size = value.bits().div_ceil(8) as u32;
    let mut compact = if size <= 3 {
        value.low_u32() << (8 * (3 - size))
    } else {
        (value >> (8 * (size - 3))).low_u32()
    };

    // Keep the mantissa positive.
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }

    (size << 24) | (compact & 0x007f_ffff)
}

pub fn compact_to_target(bits: u32) -> Result<Hash256, CompactError> {
    Ok(compact_to_u256(bits)?.to_little_endian())
}

pub fn target_to_compact(target: &Hash256) -> u32 {
    u256_to_compact(U256::from_little_endian(target))
}

/// Hashes and targets compare as 256-bit little-endian integers.
pub fn hash_meets_target(hash: &Hash256, target: &Hash256) -> bool {
    U256::from_little_endian(hash) <= U256::from_little_endian(target)
}

/// Expands `bits`, rejecting zero, negative, overflowing or too-easy targets.
pub fn checked_target(bits: u32, pow_limit: &Hash256) -> Result<Hash256, CompactError> {
    let target = compact_to_u256(bits)?;
    if target.is_zero() {
        return Err(CompactError::Zero);
    }
    if target > U256::from_little_endian(pow_limit) {
        return Err(CompactError::AboveLimit);
    }
    Ok(target.to_little_endian())
}

pub fn check_proof_of_work(
    hash: &Hash256,
    bits: u32,
    pow_limit: &Hash256,
) -> Result<bool, CompactError> {
    let target = checked_target(bits, pow_limit)?;
    Ok(hash_meets_target(hash, &target))
}
