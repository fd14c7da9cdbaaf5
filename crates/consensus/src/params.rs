//! Consensus parameter definitions.

use std::collections::BTreeMap;

use crate::deployments::{
    validate_deployments, Deployment, DeploymentError, DeploymentPos,
    MAX_VERSION_BITS_DEPLOYMENTS, NEVER32,
};
use crate::hash::{hash256_from_hex, Hash256, ZERO_HASH};
use crate::llmq::{LlmqError, LlmqParams, LlmqType, LLMQ_10_60, LLMQ_400_60, LLMQ_400_85, LLMQ_50_60};

/// Height that is never reached.
pub const NEVER_HEIGHT: i32 = i32::MAX;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Network {
    Main,
    Testnet,
    Devnet,
    Regtest,
}

pub const ALL_NETWORKS: [Network; 4] = [
    Network::Main,
    Network::Testnet,
    Network::Devnet,
    Network::Regtest,
];

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Testnet => "test",
            Network::Devnet => "dev",
            Network::Regtest => "regtest",
        }
    }

    /// Exact, case-sensitive match on the network id token.
    pub fn from_token(token: &str) -> Option<Self> {
        ALL_NETWORKS
            .iter()
            .copied()
            .find(|network| network.as_str() == token)
    }

    pub fn is_test_network(self) -> bool {
        !matches!(self, Network::Main)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConsensusParams {
    pub network: Network,
    pub subsidy_halving_interval: i32,

    pub masternode_payments_start_block: i32,
    pub masternode_payments_increase_block: i32,
    pub masternode_payments_increase_period: i32,
    pub instant_send_confirmations_required: i32,
    pub instant_send_keep_lock: i32,
    pub budget_payments_start_block: i32,
    pub budget_payments_cycle_blocks: i32,
    pub budget_payments_window_blocks: i32,
    pub superblock_start_block: i32,
    /// Required hash of the first superblock; `None` skips the check.
    pub superblock_start_hash: Option<Hash256>,
    pub superblock_cycle: i32,
    pub governance_min_quorum: i32,
    pub governance_filter_elements: i32,
    pub masternode_minimum_confirmations: i32,

    pub bip34_height: i32,
    pub bip34_hash: Option<Hash256>,
    pub bip65_height: i32,
    pub bip66_height: i32,
    pub dip0001_height: i32,
    pub dip0003_height: i32,
    pub dip0003_enforcement_height: i32,
    pub dip0003_enforcement_hash: Option<Hash256>,

    pub pow_limit: Hash256,
    pub pow_target_timespan: i64,
    pub pow_target_spacing: i64,
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_no_retargeting: bool,
    pub pow_kgw_height: i32,
    pub pow_dgw_height: i32,
    pub max_block_spacing_fix_deployment_height: Option<i32>,

    pub pos_target_spacing: i64,
    pub pos_target_timespan: i64,
    pub stake_min_age: Option<i64>,
    pub stake_max_age: i64,
    pub stake_min_age_switch_time: Option<i64>,
    pub pos_mitigation_switch_time: Option<i64>,
    /// Difficulty of the first proof-of-stake blocks.
    pub ws_target_diff: Option<u32>,
    pub pos_diff_adjust_range: Option<i32>,
    /// Last height mined with proof-of-work; later blocks are proof-of-stake.
    pub last_pow_block: i32,

    pub rule_change_activation_threshold: i64,
    pub miner_confirmation_window: i64,
    pub deployments: [Deployment; MAX_VERSION_BITS_DEPLOYMENTS],

    pub minimum_chain_work: Hash256,
    pub default_assume_valid: Hash256,

    pub llmqs: BTreeMap<LlmqType, LlmqParams>,
    pub llmq_chain_locks: LlmqType,
    pub llmq_for_instant_send: LlmqType,
    pub llmq_allow_dummy_commitments: bool,

    // Devnet-only knobs, adjustable after construction.
    pub minimum_difficulty_blocks: i32,
    pub high_subsidy_blocks: i32,
    pub high_subsidy_factor: i32,
}

impl ConsensusParams {
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    pub fn is_proof_of_stake_height(&self, height: i32) -> bool {
        height > self.last_pow_block
    }

    pub fn deployment(&self, pos: DeploymentPos) -> &Deployment {
        &self.deployments[pos.as_usize()]
    }

    pub fn deployment_window(&self, pos: DeploymentPos) -> i64 {
        self.deployment(pos)
            .window_size
            .unwrap_or(self.miner_confirmation_window)
    }

    pub fn deployment_threshold(&self, pos: DeploymentPos) -> i64 {
        self.deployment(pos)
            .threshold
            .unwrap_or(self.rule_change_activation_threshold)
    }

    pub fn dip0003_active(&self, height: i32) -> bool {
        height >= self.dip0003_height
    }

    pub fn dip0003_enforced(&self, height: i32) -> bool {
        height >= self.dip0003_enforcement_height
    }

    pub fn chain_locks_quorum(&self) -> Result<&LlmqParams, LlmqError> {
        self.llmqs
            .get(&self.llmq_chain_locks)
            .ok_or(LlmqError::Missing(self.llmq_chain_locks))
    }

    pub fn instant_send_quorum(&self) -> Result<&LlmqParams, LlmqError> {
        self.llmqs
            .get(&self.llmq_for_instant_send)
            .ok_or(LlmqError::Missing(self.llmq_for_instant_send))
    }

    pub fn validate_deployments(&self) -> Result<(), DeploymentError> {
        validate_deployments(&self.deployments)
    }

    /// Checks every bound quorum and that both roles resolve.
    pub fn validate_quorums(&self) -> Result<(), LlmqError> {
        for params in self.llmqs.values() {
            params.validate()?;
        }
        self.chain_locks_quorum()?;
        self.instant_send_quorum()?;
        Ok(())
    }
}

pub fn consensus_params(network: Network) -> ConsensusParams {
    match network {
        Network::Main => mainnet_consensus_params(),
        Network::Testnet => testnet_consensus_params(),
        Network::Devnet => devnet_consensus_params(),
        Network::Regtest => regtest_consensus_params(),
    }
}

fn llmq_map(entries: &[LlmqParams]) -> BTreeMap<LlmqType, LlmqParams> {
    entries
        .iter()
        .map(|params| (params.llmq_type, *params))
        .collect()
}

fn testdummy() -> Deployment {
    // January 1, 2008 to December 31, 2008
    Deployment::new(28, 1_199_145_601, 1_230_767_999)
}

fn mainnet_consensus_params() -> ConsensusParams {
    let deployments = [
        testdummy(),
        Deployment::new(0, 1_486_252_800, 1_517_788_800),
        Deployment::new(1, 1_508_025_600, 1_539_561_600).with_window(4032, 3226),
        Deployment::new(2, 1_524_477_600, 1_556_013_600).with_window(4032, 3226),
        Deployment::new(3, NEVER32, NEVER32).with_window(4032, 3226),
        Deployment::new(4, NEVER32, NEVER32).with_window(4032, 3226),
    ];

    ConsensusParams {
        network: Network::Main,
        subsidy_halving_interval: 262_800,
        // Any value below the increase block works.
        masternode_payments_start_block: 15,
        masternode_payments_increase_block: NEVER_HEIGHT,
        masternode_payments_increase_period: NEVER_HEIGHT,
        instant_send_confirmations_required: 6,
        instant_send_keep_lock: 24,
        budget_payments_start_block: 32_800,
        budget_payments_cycle_blocks: 16_616,
        budget_payments_window_blocks: 100,
        superblock_start_block: 66_464,
        superblock_start_hash: Some(
            hash256_from_hex("0000000000000a7d13390bb29ac6d4466afb16358aeb3cd0656215392ed2468d")
                .expect("mainnet superblock start hash"),
        ),
        superblock_cycle: 16_616,
        governance_min_quorum: 10,
        governance_filter_elements: 20_000,
        masternode_minimum_confirmations: 15,
        bip34_height: 951,
        bip34_hash: Some(
            hash256_from_hex("000001f35e70f7c5705f64c6c5cc3dea9449e74d5b5c7cf74dad1bcca14a8012")
                .expect("mainnet bip34 hash"),
        ),
        bip65_height: 84_672,
        bip66_height: 245_817,
        dip0001_height: 12_096,
        dip0003_height: NEVER_HEIGHT,
        dip0003_enforcement_height: NEVER_HEIGHT,
        dip0003_enforcement_hash: None,
        pow_limit: hash256_from_hex(
            "00000fffff000000000000000000000000000000000000000000000000000000",
        )
        .expect("mainnet pow limit"),
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 120,
        pow_allow_min_difficulty_blocks: false,
        pow_no_retargeting: false,
        pow_kgw_height: 551,
        pow_dgw_height: 551,
        max_block_spacing_fix_deployment_height: Some(381_587),
        pos_target_spacing: 2 * 60,
        pos_target_timespan: 40 * 60,
        stake_min_age: None,
        stake_max_age: 24 * 60 * 60,
        stake_min_age_switch_time: Some(1_561_734_000),
        pos_mitigation_switch_time: Some(1_570_665_600),
        ws_target_diff: Some(0x1e0f_fff0),
        pos_diff_adjust_range: Some(5),
        last_pow_block: 209_720,
        rule_change_activation_threshold: 1916, // 95% of 2016
        miner_confirmation_window: 2016,
        deployments,
        minimum_chain_work: ZERO_HASH,
        default_assume_valid: hash256_from_hex(
            "00000000000002115266e3f36778feb4fe9488fccabcd004e13c13ab46ddfaeb",
        )
        .expect("mainnet assume valid"),
        llmqs: llmq_map(&[LLMQ_50_60, LLMQ_400_60, LLMQ_400_85]),
        llmq_chain_locks: LlmqType::Llmq400_60,
        llmq_for_instant_send: LlmqType::Llmq50_60,
        llmq_allow_dummy_commitments: false,
        minimum_difficulty_blocks: 0,
        high_subsidy_blocks: 0,
        high_subsidy_factor: 1,
    }
}

fn testnet_consensus_params() -> ConsensusParams {
    let deployments = [
        testdummy(),
        Deployment::new(0, Deployment::ALWAYS_ACTIVE, Deployment::NO_TIMEOUT),
        Deployment::new(1, Deployment::ALWAYS_ACTIVE, Deployment::NO_TIMEOUT)
            .with_window(4032, 3226),
        Deployment::new(2, Deployment::ALWAYS_ACTIVE, Deployment::NO_TIMEOUT)
            .with_window(4032, 3226),
        Deployment::new(3, Deployment::ALWAYS_ACTIVE, Deployment::NO_TIMEOUT)
            .with_window(4032, 3226),
        Deployment::new(4, NEVER32, NEVER32).with_window(4032, 3226),
    ];

    ConsensusParams {
        network: Network::Testnet,
        subsidy_halving_interval: NEVER_HEIGHT,
        masternode_payments_start_block: 15,
        masternode_payments_increase_block: NEVER_HEIGHT,
        masternode_payments_increase_period: NEVER_HEIGHT,
        instant_send_confirmations_required: 2,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 46,
        budget_payments_cycle_blocks: 24,
        budget_payments_window_blocks: 10,
        superblock_start_block: 3050,
        superblock_start_hash: None,
        superblock_cycle: 24,
        governance_min_quorum: 1,
        governance_filter_elements: 500,
        masternode_minimum_confirmations: 1,
        bip34_height: 76,
        bip34_hash: Some(
            hash256_from_hex("000008ebb1db2598e897d17275285767717c6acfeac4c73def49fbea1ddcbcb6")
                .expect("testnet bip34 hash"),
        ),
        bip65_height: 2431,
        bip66_height: 2075,
        dip0001_height: 50,
        dip0003_height: 1500,
        dip0003_enforcement_height: NEVER_HEIGHT,
        dip0003_enforcement_hash: None,
        pow_limit: hash256_from_hex(
            "0000fffff0000000000000000000000000000000000000000000000000000000",
        )
        .expect("testnet pow limit"),
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 2 * 60,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        // KGW height >= DGW height means no KGW.
        pow_kgw_height: 4001,
        pow_dgw_height: 4001,
        max_block_spacing_fix_deployment_height: None,
        pos_target_spacing: 2 * 60,
        pos_target_timespan: 40 * 60,
        stake_min_age: None,
        stake_max_age: 30 * 24 * 60 * 60,
        stake_min_age_switch_time: None,
        pos_mitigation_switch_time: None,
        ws_target_diff: Some(0x1f00_ffff),
        pos_diff_adjust_range: Some(1),
        last_pow_block: 150,
        rule_change_activation_threshold: 1512, // 75%
        miner_confirmation_window: 2016,
        deployments,
        minimum_chain_work: ZERO_HASH,
        default_assume_valid: ZERO_HASH,
        llmqs: llmq_map(&[LLMQ_50_60, LLMQ_400_60, LLMQ_400_85]),
        llmq_chain_locks: LlmqType::Llmq50_60,
        llmq_for_instant_send: LlmqType::Llmq50_60,
        llmq_allow_dummy_commitments: true,
        minimum_difficulty_blocks: 0,
        high_subsidy_blocks: 0,
        high_subsidy_factor: 1,
    }
}

fn devnet_consensus_params() -> ConsensusParams {
    let deployments = [
        testdummy(),
        Deployment::new(0, 1_506_556_800, 1_538_092_800),
        Deployment::new(1, 1_505_692_800, 1_537_228_800).with_window(100, 50),
        Deployment::new(2, 1_517_792_400, 1_549_328_400).with_window(100, 50),
        Deployment::new(3, 1_535_752_800, 1_567_288_800).with_window(100, 50),
        Deployment::new(4, 1_553_126_400, 1_584_748_800).with_window(100, 50),
    ];

    ConsensusParams {
        network: Network::Devnet,
        subsidy_halving_interval: 210_240,
        masternode_payments_start_block: 4010,
        masternode_payments_increase_block: 4030,
        masternode_payments_increase_period: 10,
        instant_send_confirmations_required: 2,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 4100,
        budget_payments_cycle_blocks: 50,
        budget_payments_window_blocks: 10,
        superblock_start_block: 4200,
        superblock_start_hash: None,
        superblock_cycle: 24,
        governance_min_quorum: 1,
        governance_filter_elements: 500,
        masternode_minimum_confirmations: 1,
        bip34_height: 1,
        bip34_hash: None,
        bip65_height: 1,
        bip66_height: 1,
        dip0001_height: 2,
        dip0003_height: NEVER_HEIGHT,
        dip0003_enforcement_height: NEVER_HEIGHT,
        dip0003_enforcement_hash: None,
        pow_limit: hash256_from_hex(
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .expect("devnet pow limit"),
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 150,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        pow_kgw_height: 4001,
        pow_dgw_height: 4001,
        max_block_spacing_fix_deployment_height: Some(700),
        pos_target_spacing: 2 * 60,
        pos_target_timespan: 40 * 60,
        stake_min_age: Some(60 * 60),
        stake_max_age: 24 * 60 * 60,
        stake_min_age_switch_time: Some(1_561_734_000),
        pos_mitigation_switch_time: None,
        ws_target_diff: None,
        pos_diff_adjust_range: None,
        last_pow_block: 180_675,
        rule_change_activation_threshold: 1512,
        miner_confirmation_window: 2016,
        deployments,
        minimum_chain_work: ZERO_HASH,
        default_assume_valid: ZERO_HASH,
        llmqs: llmq_map(&[LLMQ_50_60, LLMQ_400_60, LLMQ_400_85]),
        llmq_chain_locks: LlmqType::Llmq50_60,
        llmq_for_instant_send: LlmqType::Llmq50_60,
        llmq_allow_dummy_commitments: true,
        minimum_difficulty_blocks: 0,
        high_subsidy_blocks: 0,
        high_subsidy_factor: 1,
    }
}

fn regtest_consensus_params() -> ConsensusParams {
    let deployments = [
        Deployment::new(28, 0, 999_999_999_999),
        Deployment::new(0, 0, 999_999_999_999),
        Deployment::new(1, 0, 999_999_999_999),
        Deployment::new(2, 0, 999_999_999_999),
        Deployment::new(3, 0, 999_999_999_999),
        Deployment::new(4, 0, 999_999_999_999),
    ];

    ConsensusParams {
        network: Network::Regtest,
        subsidy_halving_interval: 150,
        masternode_payments_start_block: 240,
        masternode_payments_increase_block: 350,
        masternode_payments_increase_period: 10,
        instant_send_confirmations_required: 2,
        instant_send_keep_lock: 6,
        budget_payments_start_block: 25,
        budget_payments_cycle_blocks: 50,
        budget_payments_window_blocks: 10,
        superblock_start_block: 1500,
        superblock_start_hash: None,
        superblock_cycle: 10,
        governance_min_quorum: 1,
        governance_filter_elements: 100,
        masternode_minimum_confirmations: 1,
        // Far in the future so v1 blocks are not rejected in tests.
        bip34_height: 100_000_000,
        bip34_hash: None,
        bip65_height: 1351,
        bip66_height: 1251,
        dip0001_height: 2000,
        dip0003_height: NEVER_HEIGHT,
        dip0003_enforcement_height: NEVER_HEIGHT,
        dip0003_enforcement_hash: None,
        pow_limit: hash256_from_hex(
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .expect("regtest pow limit"),
        pow_target_timespan: 24 * 60 * 60,
        pow_target_spacing: 120,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: true,
        pow_kgw_height: 15_200,
        pow_dgw_height: 34_140,
        max_block_spacing_fix_deployment_height: Some(700),
        pos_target_spacing: 30,
        pos_target_timespan: 40 * 60,
        stake_min_age: Some(60),
        stake_max_age: 24 * 60 * 60,
        stake_min_age_switch_time: Some(1_561_734_000),
        pos_mitigation_switch_time: None,
        ws_target_diff: Some(0x1e0f_fff0),
        pos_diff_adjust_range: None,
        last_pow_block: 25,
        rule_change_activation_threshold: 108, // 75% of 144
        miner_confirmation_window: 144,
        deployments,
        minimum_chain_work: ZERO_HASH,
        default_assume_valid: ZERO_HASH,
        llmqs: llmq_map(&[LLMQ_10_60, LLMQ_50_60]),
        llmq_chain_locks: LlmqType::Llmq10_60,
        llmq_for_instant_send: LlmqType::Llmq10_60,
        llmq_allow_dummy_commitments: true,
        minimum_difficulty_blocks: 0,
        high_subsidy_blocks: 0,
        high_subsidy_factor: 1,
    }
}
