mod common;

use std::sync::Arc;

use polisd_chainparams::{ParamsError, Phase};
use polisd_consensus::Network;

use common::registry;

#[test]
fn nothing_is_active_before_selection() {
    let registry = registry();
    assert_eq!(registry.active_network(), None);
    assert_eq!(registry.phase(), Phase::Setup);
    assert_eq!(registry.active_params().err(), Some(ParamsError::NotSelected));
}

#[test]
fn select_by_token() {
    let mut registry = registry();
    let selected = registry.select_network("main").expect("main");
    assert_eq!(selected.network, Network::Main);
    assert_eq!(registry.active_network(), Some(Network::Main));
    assert!(Arc::ptr_eq(
        &selected,
        &registry.active_params().expect("active")
    ));

    let regtest = registry.select_network("regtest").expect("regtest");
    assert_eq!(regtest.network_id(), "regtest");
    assert_eq!(registry.active_network(), Some(Network::Regtest));
}

#[test]
fn unknown_token_keeps_previous_selection() {
    let mut registry = registry();
    registry.select_network("test").expect("test");
    assert_eq!(
        registry.select_network("bogus").err(),
        Some(ParamsError::UnknownNetwork("bogus".to_string()))
    );
    assert_eq!(
        registry.select_network("Main").err(),
        Some(ParamsError::UnknownNetwork("Main".to_string()))
    );
    assert_eq!(registry.active_network(), Some(Network::Testnet));
}

#[test]
fn lookup_does_not_change_selection() {
    let mut registry = registry();
    registry.select(Network::Regtest).expect("regtest");
    let main = registry.params_for("main").expect("main");
    assert_eq!(main.network, Network::Main);
    assert_eq!(main.default_port, 24126);
    assert_eq!(registry.active_network(), Some(Network::Regtest));
    assert!(registry.params_for("mainnet").is_err());
}

#[test]
fn devnet_lookup_needs_selection() {
    let mut registry = registry();
    assert_eq!(
        registry.params(Network::Devnet).err(),
        Some(ParamsError::DevnetNotSelected)
    );
    assert_eq!(
        registry.params_for("dev").err(),
        Some(ParamsError::DevnetNotSelected)
    );

    registry.select(Network::Devnet).expect("dev");
    let dev = registry.params_for("dev").expect("dev built");
    assert_eq!(dev.devnet_name(), Some("devnet"));

    // Switching away keeps the built devnet.
    registry.select(Network::Main).expect("main");
    let again = registry.params(Network::Devnet).expect("still built");
    assert!(Arc::ptr_eq(&dev, &again));
}

#[test]
fn seal_freezes_selection_and_overrides() {
    let mut registry = registry();
    assert_eq!(registry.seal().err(), Some(ParamsError::NotSelected));

    registry.select(Network::Regtest).expect("regtest");
    let sealed = registry.seal().expect("seal");
    assert_eq!(registry.phase(), Phase::Running);
    assert_eq!(sealed.network, Network::Regtest);

    let again = registry.select(Network::Regtest).expect("same network");
    assert!(Arc::ptr_eq(&sealed, &again));
    assert!(matches!(
        registry.select(Network::Main),
        Err(ParamsError::Sealed { .. })
    ));
    assert!(matches!(
        registry.update_regtest_dip3(100, 200),
        Err(ParamsError::Sealed { .. })
    ));
    assert!(matches!(
        registry.set_devnet_name("late"),
        Err(ParamsError::Sealed { .. })
    ));
    assert_eq!(registry.active_network(), Some(Network::Regtest));
    assert_eq!(
        registry.active_params().expect("active").consensus.dip0003_height,
        sealed.consensus.dip0003_height
    );

    // Sealing twice is harmless.
    registry.seal().expect("seal again");
}

#[test]
fn snapshots_survive_overrides() {
    let mut registry = registry();
    registry.select(Network::Regtest).expect("regtest");
    let before = registry.active_params().expect("snapshot");

    registry.update_regtest_dip3(500, 600).expect("dip3");
    let after = registry.active_params().expect("updated");

    assert_ne!(before.consensus.dip0003_height, 500);
    assert_eq!(after.consensus.dip0003_height, 500);
    assert_eq!(after.consensus.dip0003_enforcement_height, 600);
    assert!(after.consensus.dip0003_active(500));
    assert!(!after.consensus.dip0003_enforced(599));
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn selection_is_logged() {
    polisd_log::enable_capture(4096);
    let mut registry = registry();
    registry.select(Network::Testnet).expect("test");

    let records = polisd_log::capture_snapshot(4096);
    assert!(records.iter().any(|record| {
        record.level == polisd_log::Level::Info
            && record.target == "polisd_chainparams::registry"
            && record.msg == "selected test network"
    }));
    assert!(records
        .iter()
        .any(|record| record.msg.starts_with("built test parameters")));
}
