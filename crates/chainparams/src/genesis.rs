//! Genesis block construction and integrity checks.

use polisd_consensus::money::Amount;
use polisd_consensus::{decode_hex, Hash256, Network, ZERO_HASH};
use polisd_primitives::block::{Block, BlockHeader};
use polisd_primitives::script::{ScriptBuilder, OP_CHECKSIG, OP_RETURN};
use polisd_primitives::transaction::{Transaction, TxOut};
use polisd_primitives::BlockHasher;

use crate::error::{GenesisField, ParamsError};

pub const GENESIS_MESSAGE: &str = "Polis, from people to people";

pub const GENESIS_OUTPUT_PUBKEY_HEX: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";

/// First push of every genesis coinbase (0x1d00ffff as a script number).
const GENESIS_COINBASE_MARKER: i64 = 486_604_799;

pub const DEVNET_GENESIS_VERSION: i32 = 4;

/// Pay-to-pubkey script of the genesis output.
pub fn genesis_output_script() -> Vec<u8> {
    let pubkey = decode_hex(GENESIS_OUTPUT_PUBKEY_HEX).expect("genesis output pubkey");
    ScriptBuilder::new()
        .push_slice(&pubkey)
        .push_opcode(OP_CHECKSIG)
        .into_bytes()
}

/// Builds a one-transaction genesis block with a null parent.
///
/// The coinbase script is `<486604799> <4> <message>` and its single output
/// pays `reward` to `output_script`. The result depends only on the inputs.
pub fn build_genesis_block(
    message: &str,
    output_script: Vec<u8>,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: Amount,
) -> Block {
    let script_sig = ScriptBuilder::new()
        .push_int(GENESIS_COINBASE_MARKER)
        .push_num(4)
        .push_slice(message.as_bytes())
        .into_bytes();
    let coinbase = Transaction::coinbase(
        script_sig,
        vec![TxOut {
            value: reward,
            script_pubkey: output_script,
        }],
    );
    assemble(coinbase, ZERO_HASH, time, nonce, bits, version)
}

/// Genesis block carrying the Polis coinbase message and output key.
pub fn polis_genesis(time: u32, nonce: u32, bits: u32, version: i32, reward: Amount) -> Block {
    build_genesis_block(
        GENESIS_MESSAGE,
        genesis_output_script(),
        time,
        nonce,
        bits,
        version,
        reward,
    )
}

/// Builds the devnet-specific block that follows the first genesis.
///
/// The coinbase script is `OP_1 <devnet_name>` and the output is a bare
/// `OP_RETURN`, so the reward is unspendable.
pub fn build_devnet_genesis(
    prev_block: &Hash256,
    devnet_name: &str,
    time: u32,
    nonce: u32,
    bits: u32,
    reward: Amount,
) -> Result<Block, ParamsError> {
    if devnet_name.is_empty() {
        return Err(ParamsError::EmptyDevnetName);
    }
    let script_sig = ScriptBuilder::new()
        .push_int(1)
        .push_slice(devnet_name.as_bytes())
        .into_bytes();
    let coinbase = Transaction::coinbase(
        script_sig,
        vec![TxOut {
            value: reward,
            script_pubkey: vec![OP_RETURN],
        }],
    );
    Ok(assemble(
        coinbase,
        *prev_block,
        time,
        nonce,
        bits,
        DEVNET_GENESIS_VERSION,
    ))
}

fn assemble(
    coinbase: Transaction,
    prev_block: Hash256,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
) -> Block {
    let header = BlockHeader {
        version,
        prev_block,
        // A single transaction is its own merkle root.
        merkle_root: coinbase.txid(),
        time,
        bits,
        nonce,
    };
    Block {
        header,
        transactions: vec![coinbase],
    }
}

/// Name written into the devnet genesis coinbase: `devnet` or `devnet-<name>`.
pub fn devnet_network_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "devnet".to_string()
    } else {
        format!("devnet-{name}")
    }
}

/// Checks a fixed genesis against its hard-coded merkle root and hash.
pub fn verify_genesis(
    network: Network,
    block: &Block,
    hasher: &dyn BlockHasher,
    expected_hash: &Hash256,
    expected_merkle_root: &Hash256,
) -> Result<Hash256, ParamsError> {
    let merkle_root = block.compute_merkle_root();
    if merkle_root != block.header.merkle_root || merkle_root != *expected_merkle_root {
        return Err(ParamsError::GenesisMismatch {
            network,
            field: GenesisField::MerkleRoot,
            expected: *expected_merkle_root,
            actual: merkle_root,
        });
    }
    let hash = block.header.hash_with(hasher);
    if hash != *expected_hash {
        return Err(ParamsError::GenesisMismatch {
            network,
            field: GenesisField::BlockHash,
            expected: *expected_hash,
            actual: hash,
        });
    }
    Ok(hash)
}
