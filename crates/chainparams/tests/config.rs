mod common;

use std::fs;

use polisd_chainparams::{load_conf_file, ConfigError, NodeOptions, ParamsError, Phase};
use polisd_consensus::{DeploymentPos, Network};
use polisd_log::{Format, Level};

use common::registry;

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn missing_conf_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("polis.conf");
    assert!(load_conf_file(&path).expect("load").is_none());

    let options = NodeOptions::load(Some(&path), Vec::new()).expect("defaults");
    assert_eq!(options.network, Network::Main);
    assert!(options.unknown_keys.is_empty());
}

#[test]
fn arguments_override_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("polis.conf");
    fs::write(
        &path,
        "# node options\nregtest=1\nloglevel=warn\nvbparams=csv:1:2\nrpcport=1234 ; not ours\n",
    )
    .expect("write conf");

    let options = NodeOptions::load(
        Some(&path),
        args(&["-loglevel=debug", "--logformat", "json"]),
    )
    .expect("options");
    assert_eq!(options.network, Network::Regtest);
    assert_eq!(options.log.level, Level::Debug);
    assert_eq!(options.log.format, Format::Json);
    assert_eq!(options.deployments.len(), 1);
    assert_eq!(options.unknown_keys, vec!["rpcport".to_string()]);
}

#[test]
fn apply_configures_regtest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("polis.conf");
    fs::write(
        &path,
        "network=regtest\nvbparams=dip0003:100:200:4000:3000\nvbparams=csv:5:6\nbudgetparams=10:20:30\ndip3params=40:50\n",
    )
    .expect("write conf");

    let options = NodeOptions::load(Some(&path), Vec::new()).expect("options");
    let mut registry = registry();
    let params = options.apply(&mut registry).expect("apply");
    assert_eq!(registry.phase(), Phase::Setup);
    assert_eq!(params.network, Network::Regtest);

    let consensus = &params.consensus;
    let dip3 = consensus.deployment(DeploymentPos::Dip0003);
    assert_eq!((dip3.start_time, dip3.timeout), (100, 200));
    assert_eq!(consensus.deployment_window(DeploymentPos::Dip0003), 4000);
    assert_eq!(consensus.deployment_threshold(DeploymentPos::Dip0003), 3000);
    assert_eq!(consensus.deployment(DeploymentPos::Csv).start_time, 5);
    assert_eq!(consensus.superblock_start_block, 30);
    assert_eq!(consensus.dip0003_height, 40);
    assert_eq!(consensus.dip0003_enforcement_height, 50);
}

#[test]
fn apply_builds_named_devnet() {
    let options = NodeOptions::load(
        None,
        args(&["-devnet=alpha", "-highsubsidyblocks=500", "-highsubsidyfactor=10"]),
    )
    .expect("options");
    let mut registry = registry();
    let params = options.apply(&mut registry).expect("apply");
    assert_eq!(params.devnet_name(), Some("devnet-alpha"));
    assert_eq!(params.consensus.minimum_difficulty_blocks, 0);
    assert_eq!(params.consensus.high_subsidy_blocks, 500);
    assert_eq!(params.consensus.high_subsidy_factor, 10);
}

#[test]
fn test_only_options_rejected_elsewhere() {
    let mut registry = registry();
    let options = NodeOptions::load(None, args(&["-testnet", "-dip3params=1:2"])).expect("options");
    assert!(matches!(
        options.apply(&mut registry),
        Err(ConfigError::Params(ParamsError::WrongNetwork {
            network: Network::Testnet,
            ..
        }))
    ));
    assert_eq!(registry.active_network(), None);

    let options =
        NodeOptions::load(None, args(&["-regtest", "-minimumdifficultyblocks=5"])).expect("options");
    assert!(matches!(
        options.apply(&mut registry),
        Err(ConfigError::Params(ParamsError::WrongNetwork {
            network: Network::Regtest,
            ..
        }))
    ));
}

#[test]
fn apply_after_seal_is_rejected() {
    let mut registry = registry();
    registry.select(Network::Main).expect("main");
    registry.seal().expect("seal");
    let options = NodeOptions::load(None, args(&["-regtest"])).expect("options");
    assert!(matches!(
        options.apply(&mut registry),
        Err(ConfigError::Params(ParamsError::Sealed { .. }))
    ));
}

#[test]
fn malformed_values_are_reported() {
    for bad in [
        "-network=mainnet",
        "-budgetparams=1:2",
        "-dip3params=a:b",
        "-vbparams=csv",
        "-highsubsidyfactor=lots",
        "-regtest=maybe",
    ] {
        assert!(
            matches!(
                NodeOptions::load(None, args(&[bad])),
                Err(ConfigError::InvalidValue { .. })
            ),
            "{bad}"
        );
    }
}
