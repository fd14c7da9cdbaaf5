//! The four network profiles.

use polisd_consensus::money::GENESIS_REWARD;
use polisd_consensus::{consensus_params, decode_hex, hash256_from_hex, hash256_to_hex, Network};
use polisd_log::log_info;
use polisd_primitives::BlockHasher;

use crate::chain::{
    Base58Prefixes, ChainParams, ChainTxData, Checkpoint, DevnetGenesis, NetworkFlags,
};
use crate::error::ParamsError;
use crate::genesis::{devnet_network_name, polis_genesis, verify_genesis};
use crate::miner::{find_devnet_genesis, mine_block};

const GENESIS_MERKLE_ROOT: &str =
    "5dc9bcf5d1e4802dad0045a88849e3ad97d07a5b8aaee1114ed5ae03b98c4bfc";
const MAINNET_GENESIS_HASH: &str =
    "000009701eb781a8113b1af1d814e2f060f6408a2c990db291bc5108a1345c1e";
const REGTEST_GENESIS_HASH: &str =
    "00000f3b4ec57f851b3706c056eda3120875896c9970495ae2efd49b46472a05";

const MAINNET_ALERT_KEY: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";
const TESTNET_ALERT_KEY: &str = "04517d8a699cb43d3938d7b24faaff7cda448ca4ea267723ba614784de661949bf632d6304316b244646dea079735b9a6fc4af804efb4752075b9fe2245e14e412";

const MAINNET_DNS_SEEDS: [&str; 2] = ["dnsseed.poliscentral.org", "dnsseed.polispay.org"];
const TESTNET_DNS_SEEDS: [&str; 2] = [
    "testnetseed.poliscentral.org",
    "testnetseed2.poliscentral.org",
];
const NO_SEEDS: [&str; 0] = [];

const MAINNET_SPORK_ADDRESSES: [&str; 1] = ["PAvya6xSBRb755Uhe2aXBFsjuyi68hTP8u"];
const TESTNET_SPORK_ADDRESSES: [&str; 1] = ["yMCScEFCuhFGQL8aBS8UPXnKriFtjMVWra"];
const DEVNET_SPORK_ADDRESSES: [&str; 1] = ["yjPtiKh2uwk3bDutTEA2q9mCtXyiZRWn55"];
const REGTEST_SPORK_ADDRESSES: [&str; 1] = ["yj949n1UH6fDhw6HtVE5VMj2iSTaSWBMcW"];

const MAINNET_PREFIXES: Base58Prefixes = Base58Prefixes {
    pubkey_address: 55,
    script_address: 56,
    secret_key: 60,
    ext_public_key: [0x03, 0xe2, 0x5d, 0x7e],
    ext_secret_key: [0x03, 0xe2, 0x59, 0x45],
};

const TEST_PREFIXES: Base58Prefixes = Base58Prefixes {
    pubkey_address: 140,
    script_address: 19,
    secret_key: 239,
    ext_public_key: [0x04, 0x35, 0x87, 0xcf],
    ext_secret_key: [0x04, 0x35, 0x83, 0x94],
};

/// Builds the profile for `network`. `devnet_name` is only read for
/// [`Network::Devnet`].
pub fn build_chain_params(
    network: Network,
    hasher: &dyn BlockHasher,
    devnet_name: &str,
) -> Result<ChainParams, ParamsError> {
    let params = match network {
        Network::Main => mainnet_chain_params(hasher)?,
        Network::Testnet => testnet_chain_params(hasher)?,
        Network::Devnet => devnet_chain_params(hasher, devnet_name)?,
        Network::Regtest => regtest_chain_params(hasher)?,
    };
    params.validate()?;
    log_info!(
        "built {} parameters (genesis {}, {} checkpoints)",
        network,
        hash256_to_hex(&params.genesis_hash),
        params.checkpoints.len()
    );
    Ok(params)
}

fn mainnet_chain_params(hasher: &dyn BlockHasher) -> Result<ChainParams, ParamsError> {
    let genesis = polis_genesis(1_513_862_955, 327_643, 0x1e0f_fff0, 1, GENESIS_REWARD);
    let genesis_hash = verify_genesis(
        Network::Main,
        &genesis,
        hasher,
        &hash256_from_hex(MAINNET_GENESIS_HASH).expect("mainnet genesis hash"),
        &hash256_from_hex(GENESIS_MERKLE_ROOT).expect("genesis merkle root"),
    )?;

    Ok(ChainParams {
        network: Network::Main,
        consensus: consensus_params(Network::Main),
        message_start: [0xbf, 0x0c, 0x6b, 0xbd],
        default_port: 24126,
        prune_after_height: 100_000,
        alert_pubkey: decode_hex(MAINNET_ALERT_KEY).expect("mainnet alert key"),
        genesis,
        genesis_hash,
        devnet_genesis: None,
        dns_seeds: &MAINNET_DNS_SEEDS,
        fixed_seeds: &NO_SEEDS,
        base58_prefixes: MAINNET_PREFIXES,
        ext_coin_type: 1997,
        flags: NetworkFlags {
            mining_requires_peers: true,
            default_consistency_checks: false,
            require_standard: true,
            mine_blocks_on_demand: false,
            allow_multiple_addresses_from_group: false,
            allow_multiple_ports: false,
            bip9_check_masternodes_upgraded: true,
        },
        pool_min_participants: 3,
        pool_max_participants: 5,
        fulfilled_request_expire_time: 60 * 60,
        spork_addresses: &MAINNET_SPORK_ADDRESSES,
        min_spork_keys: 1,
        checkpoints: mainnet_checkpoints(),
        chain_tx_data: ChainTxData {
            time: 1_561_487_163,
            tx_count: 900_795,
            tx_rate: 0.1,
        },
    })
}

fn testnet_chain_params(hasher: &dyn BlockHasher) -> Result<ChainParams, ParamsError> {
    let consensus = consensus_params(Network::Testnet);
    // No fixed nonce: search up to the proof-of-work limit.
    let candidate = polis_genesis(1_569_000_000, 0, 0x1f00_ffff, 1, GENESIS_REWARD);
    let (genesis, found) = mine_block(Network::Testnet, candidate, &consensus.pow_limit, hasher)?;
    let genesis_hash = found.hash;

    Ok(ChainParams {
        network: Network::Testnet,
        consensus,
        message_start: [0xce, 0xe2, 0xca, 0xff],
        default_port: 21430,
        prune_after_height: 1000,
        alert_pubkey: decode_hex(TESTNET_ALERT_KEY).expect("testnet alert key"),
        genesis,
        genesis_hash,
        devnet_genesis: None,
        dns_seeds: &TESTNET_DNS_SEEDS,
        fixed_seeds: &NO_SEEDS,
        base58_prefixes: TEST_PREFIXES,
        ext_coin_type: 1,
        flags: NetworkFlags {
            mining_requires_peers: true,
            default_consistency_checks: false,
            require_standard: false,
            mine_blocks_on_demand: false,
            allow_multiple_addresses_from_group: false,
            allow_multiple_ports: false,
            bip9_check_masternodes_upgraded: true,
        },
        pool_min_participants: 3,
        pool_max_participants: 3,
        fulfilled_request_expire_time: 5 * 60,
        spork_addresses: &TESTNET_SPORK_ADDRESSES,
        min_spork_keys: 1,
        checkpoints: vec![Checkpoint {
            height: 0,
            hash: genesis_hash,
        }],
        chain_tx_data: ChainTxData::EMPTY,
    })
}

fn devnet_chain_params(
    hasher: &dyn BlockHasher,
    devnet_name: &str,
) -> Result<ChainParams, ParamsError> {
    let genesis = polis_genesis(1_417_713_337, 1_096_447, 0x207f_ffff, 1, GENESIS_REWARD);
    let genesis_hash = genesis.header.hash_with(hasher);

    let name = devnet_network_name(devnet_name);
    let (devnet_block, found) =
        find_devnet_genesis(&genesis, &genesis_hash, &name, GENESIS_REWARD, hasher)?;
    let chain_tx_data = ChainTxData {
        time: i64::from(devnet_block.header.time),
        // Both genesis coinbases.
        tx_count: 2,
        tx_rate: 0.01,
    };

    Ok(ChainParams {
        network: Network::Devnet,
        consensus: consensus_params(Network::Devnet),
        message_start: [0xe2, 0xca, 0xff, 0xce],
        default_port: 19999,
        prune_after_height: 1000,
        alert_pubkey: decode_hex(TESTNET_ALERT_KEY).expect("devnet alert key"),
        genesis,
        genesis_hash,
        devnet_genesis: Some(DevnetGenesis {
            name,
            block: devnet_block,
            hash: found.hash,
        }),
        dns_seeds: &NO_SEEDS,
        fixed_seeds: &NO_SEEDS,
        base58_prefixes: TEST_PREFIXES,
        ext_coin_type: 1,
        flags: NetworkFlags {
            mining_requires_peers: true,
            default_consistency_checks: false,
            require_standard: false,
            mine_blocks_on_demand: false,
            allow_multiple_addresses_from_group: true,
            allow_multiple_ports: true,
            // Fresh devnets have no masternodes to check.
            bip9_check_masternodes_upgraded: false,
        },
        pool_min_participants: 3,
        pool_max_participants: 3,
        fulfilled_request_expire_time: 5 * 60,
        spork_addresses: &DEVNET_SPORK_ADDRESSES,
        min_spork_keys: 1,
        checkpoints: vec![
            Checkpoint {
                height: 0,
                hash: genesis_hash,
            },
            Checkpoint {
                height: 1,
                hash: found.hash,
            },
        ],
        chain_tx_data,
    })
}

fn regtest_chain_params(hasher: &dyn BlockHasher) -> Result<ChainParams, ParamsError> {
    let genesis = polis_genesis(1_513_831_322, 887_612, 0x1e0f_fff0, 1, GENESIS_REWARD);
    let genesis_hash = verify_genesis(
        Network::Regtest,
        &genesis,
        hasher,
        &hash256_from_hex(REGTEST_GENESIS_HASH).expect("regtest genesis hash"),
        &hash256_from_hex(GENESIS_MERKLE_ROOT).expect("genesis merkle root"),
    )?;

    Ok(ChainParams {
        network: Network::Regtest,
        consensus: consensus_params(Network::Regtest),
        message_start: [0xfc, 0xc1, 0xb7, 0xdc],
        default_port: 19994,
        prune_after_height: 1000,
        alert_pubkey: Vec::new(),
        genesis,
        genesis_hash,
        devnet_genesis: None,
        dns_seeds: &NO_SEEDS,
        fixed_seeds: &NO_SEEDS,
        base58_prefixes: TEST_PREFIXES,
        ext_coin_type: 1,
        flags: NetworkFlags {
            mining_requires_peers: false,
            default_consistency_checks: true,
            require_standard: false,
            mine_blocks_on_demand: true,
            allow_multiple_addresses_from_group: true,
            allow_multiple_ports: true,
            bip9_check_masternodes_upgraded: false,
        },
        pool_min_participants: 3,
        pool_max_participants: 5,
        fulfilled_request_expire_time: 5 * 60,
        spork_addresses: &REGTEST_SPORK_ADDRESSES,
        min_spork_keys: 1,
        checkpoints: vec![Checkpoint {
            height: 0,
            hash: genesis_hash,
        }],
        chain_tx_data: ChainTxData::EMPTY,
    })
}

fn parse_checkpoints(entries: &[(i32, &str)]) -> Vec<Checkpoint> {
    entries
        .iter()
        .map(|(height, hash)| Checkpoint {
            height: *height,
            hash: hash256_from_hex(hash).expect("checkpoint hash"),
        })
        .collect()
}

fn mainnet_checkpoints() -> Vec<Checkpoint> {
    parse_checkpoints(&[
        (0, MAINNET_GENESIS_HASH),
        (10, "000006f686844f1873f4fcf77516eaa0a11f5762b797314c5875438c97fe4562"),
        (50, "00000547ca650f3be6ddf31871dfd5f76faafcd12b6083706e3d0a88c9a0cdbe"),
        (100, "000001c12d74ca8120d2751bb2846a5af44892045099750efe73a0cbb1eca860"),
        (200, "000000053db45327e7fcce9b8baf9060622c01456ac677121a6f8dcf15a98d7b"),
        (300, "00000000027d5a77e5c38e366465be2f21292fa3eb4d290efb6316eebcc5c0ca"),
        (400, "0000000000004bcce3cea51dd54da213272b7ef1aa35dca5269e92a56ec7974b"),
        (500, "000000000000157f78c69400b85824588e381ca4d11384e172394468a02bea32"),
        (1000, "00000000000061cd1733fc8b84017169be61d6a2406f21f8dca0dd9a57c7de96"),
        (2000, "000000000000129a0f9540f12a27a6b13242fa2d9b90f52083d860fa5ef5ec3e"),
        (3000, "0000000000000b5968c7af1b6e76b6958aa6058bf2f0a7aa66e67cbf4d47b690"),
        (4000, "0000000000000b443f7faeaaf85178b5364664ee7374259cf0f7b03e9531a108"),
        (5000, "00000000000004779b06d324ea780378ad8e41ddc9056129444030243faf5ad4"),
        (6000, "00000000000027ffb241efa3fafa43a3121216d70e79b28bc2afb8457d84cbfe"),
        (7000, "0000000000003a79e1b54fe39070e0d53799cdca901db726eb1c847ce8d0c890"),
        (8000, "000000000000045991733d2bc793d17a6fcafd7bfa35adb68b4036813b64fbf1"),
        (70000, "00000000000006fd8cdcc16c6432c8934e8f4b598f447db295851107437647a7"),
        (80000, "0000000000000eaf98251863568f95a865bba9476e060d93dfd7f02f123b0748"),
        (100000, "0000000000000818820ee2aecc291c7b6076984cf7c0c152869de128cf30262f"),
        (111111, "0000000000000bcea9747fd93566d7c37d7e07afb50066f332e17925ef776b3b"),
        // Proof-of-stake blocks from here on.
        (226729, "679fcb43f8318a3bdf42908c5290b6871426de008321589b72dcca907eeba0ea"),
        (229186, "79eb91ffb16cf095b4bc730ea2bd158df1aa81ee3246f64b85535b18d91593d6"),
        (262800, "c7ba46c8521735e42a84f9bb84b5bcc3fb6b57a2f32aee5d5c03ab52e0cf0e57"),
        (270300, "e31ddef7188566d6bbd8b1b74ba31b1ade883673bec95c6b4a41d5c21ab7f691"),
        (280600, "f2911e19b667f05b091d8217098813055aa26e1eca6c8eba5b84ff63df414208"),
        (324353, "852675a3957d48e0f1198fdda33e496211317d89bab71ff39c28faaf3d4e61af"),
        (336284, "d3dbdedff4c5b1f6e47ab43d2b0dc1f9a5a011035b4b936284a5b8725d405a78"),
        (379624, "58b38dde8562a110d53bae6cc5326678615a9f461095bcc189b6de6d0f7e65cc"),
    ])
}
