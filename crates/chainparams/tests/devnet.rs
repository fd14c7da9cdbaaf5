mod common;

use polisd_chainparams::{
    build_chain_params, devnet_network_name, find_devnet_genesis, polis_genesis, ParamsError,
};
use polisd_consensus::money::GENESIS_REWARD;
use polisd_consensus::{hash256_to_hex, Network};
use polisd_pow::check_proof_of_work;
use polisd_primitives::Sha256dHasher;

use common::{fixture_hasher, registry};

#[test]
fn devnet_names() {
    assert_eq!(devnet_network_name(""), "devnet");
    assert_eq!(devnet_network_name("  "), "devnet");
    assert_eq!(devnet_network_name("alpha"), "devnet-alpha");
}

#[test]
fn devnet_genesis_fixtures() {
    let hasher = fixture_hasher();
    let cases = [
        (
            "",
            "devnet",
            "5ca13a0aa3f10afcfeb3ec510b0382dbad0b2f31fb97390e437f3ffb7bfc4d9a",
            "d854173737ba9ab2094f1c3e801705df14f35affa990f137c87b1bb2c7197a74",
        ),
        (
            "alpha",
            "devnet-alpha",
            "2f9a05119c3efcf1adb6aec7be0f5027a33e3351c7a206a80908afb3aa76d058",
            "3ff2cbea528db228a1696f8da2920055b2df91f09c03a13380ec1c5aae7c63ca",
        ),
    ];
    for (name, network_name, block_hash, merkle_root) in cases {
        let params = build_chain_params(Network::Devnet, hasher.as_ref(), name).expect("devnet");
        assert_eq!(
            hash256_to_hex(&params.genesis_hash),
            "431a6da60889a5d1557917a88de23a7a6c50a89e39c84f6eda874e054bd15948"
        );

        let devnet = params.devnet_genesis.as_ref().expect("devnet genesis");
        assert_eq!(devnet.name, network_name);
        assert_eq!(hash256_to_hex(&devnet.hash), block_hash);
        assert_eq!(hash256_to_hex(&devnet.block.header.merkle_root), merkle_root);
        assert_eq!(devnet.block.header.nonce, 0);
        assert_eq!(devnet.block.header.time, 1_417_713_338);
        assert_eq!(devnet.block.header.prev_block, params.genesis_hash);

        assert_eq!(params.checkpoints.len(), 2);
        assert_eq!(params.checkpoint_hash(0), Some(params.genesis_hash));
        assert_eq!(params.checkpoint_hash(1), Some(devnet.hash));
        assert_eq!(params.chain_tx_data.tx_count, 2);
    }
}

#[test]
fn mined_devnet_blocks_meet_their_target() {
    let parent = polis_genesis(1_600_000_000, 0, 0x2000_ffff, 1, GENESIS_REWARD);
    let parent_hash = parent.header.hash_with(&Sha256dHasher);
    let pow_limit = [0xffu8; 32];

    for i in 0..100 {
        let name = format!("devnet-prop{i}");
        let (block, found) =
            find_devnet_genesis(&parent, &parent_hash, &name, GENESIS_REWARD, &Sha256dHasher)
                .expect("mined");

        assert_eq!(block.header.nonce, found.nonce);
        assert_eq!(block.header.hash_with(&Sha256dHasher), found.hash);
        assert_eq!(block.header.prev_block, parent_hash);
        assert_eq!(block.header.bits, parent.header.bits);
        assert_eq!(block.header.time, parent.header.time + 1);
        assert_eq!(block.header.merkle_root, block.compute_merkle_root());
        assert!(check_proof_of_work(&found.hash, block.header.bits, &pow_limit).expect("bits"));

        let script_sig = &block.transactions[0].vin[0].script_sig;
        assert!(script_sig
            .windows(name.len())
            .any(|window| window == name.as_bytes()));
    }
}

#[test]
fn empty_devnet_name_is_rejected() {
    let parent = polis_genesis(1_417_713_337, 1_096_447, 0x207f_ffff, 1, GENESIS_REWARD);
    let parent_hash = parent.header.hash_with(&Sha256dHasher);
    assert_eq!(
        find_devnet_genesis(&parent, &parent_hash, "", GENESIS_REWARD, &Sha256dHasher).err(),
        Some(ParamsError::EmptyDevnetName)
    );
}

#[test]
fn renaming_rebuilds_an_active_devnet() {
    let mut registry = registry();
    registry.set_devnet_name("alpha").expect("name");
    let alpha = registry.select(Network::Devnet).expect("dev");
    assert_eq!(alpha.devnet_name(), Some("devnet-alpha"));

    registry.set_devnet_name("beta").expect("rename");
    let beta = registry.active_params().expect("active");
    assert_eq!(beta.devnet_name(), Some("devnet-beta"));
    assert_ne!(alpha.checkpoint_hash(1), beta.checkpoint_hash(1));
    assert_eq!(alpha.devnet_name(), Some("devnet-alpha"));
}

#[test]
fn renaming_drops_an_inactive_devnet() {
    let mut registry = registry();
    registry.select(Network::Devnet).expect("dev");
    registry.select(Network::Main).expect("main");
    registry.set_devnet_name("gamma").expect("rename");
    assert_eq!(
        registry.params(Network::Devnet).err(),
        Some(ParamsError::DevnetNotSelected)
    );
    let gamma = registry.select(Network::Devnet).expect("rebuilt");
    assert_eq!(gamma.devnet_name(), Some("devnet-gamma"));
}
