mod common;

use std::sync::Arc;

use polisd_chainparams::{
    build_chain_params, polis_genesis, GenesisField, ParamsError, ParamsRegistry,
};
use polisd_consensus::money::GENESIS_REWARD;
use polisd_consensus::{hash256_to_hex, Network, ALL_NETWORKS};
use polisd_primitives::Sha256dHasher;

use common::{fixture_hasher, hash, GENESIS_MERKLE_ROOT, MAIN_GENESIS_HASH, REGTEST_GENESIS_HASH};

#[test]
fn mainnet_genesis_matches_published_values() {
    let params = build_chain_params(Network::Main, fixture_hasher().as_ref(), "").expect("main");
    assert_eq!(params.genesis_hash, hash(MAIN_GENESIS_HASH));
    assert_eq!(params.genesis.header.merkle_root, hash(GENESIS_MERKLE_ROOT));
    assert_eq!(params.genesis.header.time, 1_513_862_955);
    assert_eq!(params.genesis.header.nonce, 327_643);
    assert_eq!(params.genesis.header.bits, 0x1e0f_fff0);
    assert_eq!(params.genesis.transactions.len(), 1);
    assert_eq!(params.genesis.transactions[0].vout[0].value, GENESIS_REWARD);
    assert_eq!(params.checkpoint_hash(0), Some(params.genesis_hash));
}

#[test]
fn regtest_genesis_matches_published_values() {
    let params =
        build_chain_params(Network::Regtest, fixture_hasher().as_ref(), "").expect("regtest");
    assert_eq!(params.genesis_hash, hash(REGTEST_GENESIS_HASH));
    assert_eq!(params.genesis.header.merkle_root, hash(GENESIS_MERKLE_ROOT));
    assert_eq!(params.checkpoint_hash(0), Some(params.genesis_hash));
}

#[test]
fn wrong_header_hash_is_fatal() {
    let err = build_chain_params(Network::Main, &Sha256dHasher, "").expect_err("mismatch");
    match err {
        ParamsError::GenesisMismatch {
            network,
            field,
            expected,
            actual,
        } => {
            assert_eq!(network, Network::Main);
            assert_eq!(field, GenesisField::BlockHash);
            assert_eq!(expected, hash(MAIN_GENESIS_HASH));
            assert_eq!(
                hash256_to_hex(&actual),
                "42b0004c8f3e88706b0fbdfcf00cfa10ba5d92da7b9aac5618cb6f4c8e143f20"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        ParamsRegistry::new(Arc::new(Sha256dHasher)),
        Err(ParamsError::GenesisMismatch { .. })
    ));
}

#[test]
fn testnet_genesis_is_mined_at_startup() {
    let params =
        build_chain_params(Network::Testnet, fixture_hasher().as_ref(), "").expect("testnet");
    assert_eq!(params.genesis.header.nonce, 283_260);
    assert_eq!(
        hash256_to_hex(&params.genesis_hash),
        "00008998d6c424a22491fc4d83beca5d88425315456e13f762f090f97a6f54aa"
    );
    assert_eq!(params.genesis.header.merkle_root, hash(GENESIS_MERKLE_ROOT));
    assert_eq!(params.checkpoints.len(), 1);
    assert_eq!(params.checkpoint_hash(0), Some(params.genesis_hash));
}

#[test]
fn construction_is_deterministic() {
    let hasher = fixture_hasher();
    for network in ALL_NETWORKS {
        let a = build_chain_params(network, hasher.as_ref(), "alpha").expect("first");
        let b = build_chain_params(network, hasher.as_ref(), "alpha").expect("second");
        assert_eq!(a.genesis, b.genesis, "{network}");
        assert_eq!(a.genesis_hash, b.genesis_hash, "{network}");
        assert_eq!(a.checkpoints, b.checkpoints, "{network}");
        assert_eq!(a.consensus, b.consensus, "{network}");
    }
}

#[test]
fn genesis_constructor_depends_on_every_input() {
    let base = polis_genesis(1_513_862_955, 327_643, 0x1e0f_fff0, 1, GENESIS_REWARD);
    let variants = [
        polis_genesis(1_513_862_956, 327_643, 0x1e0f_fff0, 1, GENESIS_REWARD),
        polis_genesis(1_513_862_955, 327_644, 0x1e0f_fff0, 1, GENESIS_REWARD),
        polis_genesis(1_513_862_955, 327_643, 0x1e0f_fff1, 1, GENESIS_REWARD),
        polis_genesis(1_513_862_955, 327_643, 0x1e0f_fff0, 2, GENESIS_REWARD),
        polis_genesis(1_513_862_955, 327_643, 0x1e0f_fff0, 1, GENESIS_REWARD + 1),
    ];
    for variant in variants {
        assert_ne!(
            variant.header.hash_with(&Sha256dHasher),
            base.header.hash_with(&Sha256dHasher)
        );
    }
}

#[test]
fn every_profile_passes_structural_checks() {
    let hasher = fixture_hasher();
    for network in ALL_NETWORKS {
        let params = build_chain_params(network, hasher.as_ref(), "").expect("params");
        assert_eq!(params.network, network);
        assert_eq!(params.network_id(), network.as_str());
        params.validate().expect("valid profile");
        assert!(params.consensus.chain_locks_quorum().is_ok());
        assert!(params.consensus.instant_send_quorum().is_ok());
    }
}
