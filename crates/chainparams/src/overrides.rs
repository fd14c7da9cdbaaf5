//! Post-construction adjustments allowed on the test networks.
//!
//! Deployment, DIP0003 and budget updates apply to `regtest` only; the
//! subsidy/difficulty knobs apply to `dev` only. Any other network is
//! rejected with [`ParamsError::WrongNetwork`].

use polisd_consensus::deployments::validate_deployments;
use polisd_consensus::{DeploymentPos, Network};
use polisd_log::log_info;

use crate::chain::ChainParams;
use crate::error::ParamsError;

/// Raw value meaning "keep the current window or threshold".
pub const UNCHANGED: i64 = -1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeploymentUpdate {
    pub start_time: i64,
    pub timeout: i64,
    pub window_size: Option<i64>,
    pub threshold: Option<i64>,
}

impl DeploymentUpdate {
    pub fn new(start_time: i64, timeout: i64) -> Self {
        Self {
            start_time,
            timeout,
            window_size: None,
            threshold: None,
        }
    }

    /// Maps [`UNCHANGED`] window/threshold values to `None`.
    pub fn from_raw(start_time: i64, timeout: i64, window_size: i64, threshold: i64) -> Self {
        let keep = |value: i64| (value != UNCHANGED).then_some(value);
        Self {
            start_time,
            timeout,
            window_size: keep(window_size),
            threshold: keep(threshold),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BudgetSchedule {
    pub masternode_payments_start: i32,
    pub budget_payments_start: i32,
    pub superblock_start: i32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DevnetKnobs {
    pub minimum_difficulty_blocks: i32,
    pub high_subsidy_blocks: i32,
    pub high_subsidy_factor: i32,
}

fn require(
    params: &ChainParams,
    network: Network,
    operation: &'static str,
) -> Result<(), ParamsError> {
    if params.network != network {
        return Err(ParamsError::WrongNetwork {
            operation,
            network: params.network,
        });
    }
    Ok(())
}

pub fn update_regtest_deployment(
    params: &mut ChainParams,
    pos: DeploymentPos,
    update: DeploymentUpdate,
) -> Result<(), ParamsError> {
    require(params, Network::Regtest, "deployment update")?;

    let mut deployments = params.consensus.deployments;
    let deployment = &mut deployments[pos.as_usize()];
    deployment.start_time = update.start_time;
    deployment.timeout = update.timeout;
    if let Some(window_size) = update.window_size {
        deployment.window_size = Some(window_size);
    }
    if let Some(threshold) = update.threshold {
        deployment.threshold = Some(threshold);
    }
    validate_deployments(&deployments)?;
    params.consensus.deployments = deployments;

    log_info!(
        "regtest deployment {} set to start {} timeout {} window {} threshold {}",
        pos.name(),
        update.start_time,
        update.timeout,
        params.consensus.deployment_window(pos),
        params.consensus.deployment_threshold(pos)
    );
    Ok(())
}

pub fn update_regtest_dip3(
    params: &mut ChainParams,
    activation_height: i32,
    enforcement_height: i32,
) -> Result<(), ParamsError> {
    require(params, Network::Regtest, "dip3 update")?;
    params.consensus.dip0003_height = activation_height;
    params.consensus.dip0003_enforcement_height = enforcement_height;
    log_info!("regtest dip3 activation {activation_height} enforcement {enforcement_height}");
    Ok(())
}

pub fn update_regtest_budget(
    params: &mut ChainParams,
    schedule: BudgetSchedule,
) -> Result<(), ParamsError> {
    require(params, Network::Regtest, "budget update")?;
    if schedule.superblock_start <= schedule.budget_payments_start {
        return Err(ParamsError::InvalidBudgetSchedule {
            budget_start: schedule.budget_payments_start,
            superblock_start: schedule.superblock_start,
        });
    }
    let consensus = &mut params.consensus;
    consensus.masternode_payments_start_block = schedule.masternode_payments_start;
    consensus.budget_payments_start_block = schedule.budget_payments_start;
    consensus.superblock_start_block = schedule.superblock_start;
    log_info!(
        "regtest budget: masternode {} budget {} superblock {}",
        schedule.masternode_payments_start,
        schedule.budget_payments_start,
        schedule.superblock_start
    );
    Ok(())
}

pub fn update_devnet_subsidy_and_diff(
    params: &mut ChainParams,
    knobs: DevnetKnobs,
) -> Result<(), ParamsError> {
    require(params, Network::Devnet, "subsidy and difficulty update")?;
    let consensus = &mut params.consensus;
    consensus.minimum_difficulty_blocks = knobs.minimum_difficulty_blocks;
    consensus.high_subsidy_blocks = knobs.high_subsidy_blocks;
    consensus.high_subsidy_factor = knobs.high_subsidy_factor;
    log_info!(
        "devnet knobs: min difficulty blocks {} high subsidy blocks {} factor {}",
        knobs.minimum_difficulty_blocks,
        knobs.high_subsidy_blocks,
        knobs.high_subsidy_factor
    );
    Ok(())
}
