//! Selection of the active network profile.

use std::sync::Arc;

use polisd_consensus::{DeploymentPos, Network};
use polisd_log::{log_info, log_warn};
use polisd_primitives::BlockHasher;

use crate::chain::ChainParams;
use crate::error::ParamsError;
use crate::networks::build_chain_params;
use crate::overrides::{
    update_devnet_subsidy_and_diff, update_regtest_budget, update_regtest_deployment,
    update_regtest_dip3, BudgetSchedule, DeploymentUpdate, DevnetKnobs,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Selection and test-network overrides are allowed.
    Setup,
    /// Parameters are frozen; only re-selecting the active network succeeds.
    Running,
}

/// Owns every network profile and the active selection.
///
/// `main`, `test` and `regtest` are built by [`ParamsRegistry::new`]. The
/// devnet profile is built the first time `dev` is selected and kept until
/// the devnet name changes. Readers get `Arc` snapshots; overrides made
/// during setup copy the profile first, so earlier snapshots never change.
pub struct ParamsRegistry {
    hasher: Arc<dyn BlockHasher>,
    devnet_name: String,
    main: Arc<ChainParams>,
    testnet: Arc<ChainParams>,
    regtest: Arc<ChainParams>,
    devnet: Option<Arc<ChainParams>>,
    active: Option<Network>,
    phase: Phase,
}

impl ParamsRegistry {
    pub fn new(hasher: Arc<dyn BlockHasher>) -> Result<Self, ParamsError> {
        let main = Arc::new(build_chain_params(Network::Main, hasher.as_ref(), "")?);
        let testnet = Arc::new(build_chain_params(Network::Testnet, hasher.as_ref(), "")?);
        let regtest = Arc::new(build_chain_params(Network::Regtest, hasher.as_ref(), "")?);
        Ok(Self {
            hasher,
            devnet_name: String::new(),
            main,
            testnet,
            regtest,
            devnet: None,
            active: None,
            phase: Phase::Setup,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_network(&self) -> Option<Network> {
        self.active
    }

    /// Name used for the next devnet build. A built devnet with another
    /// name is discarded, and rebuilt at once if `dev` is active.
    pub fn set_devnet_name(&mut self, name: &str) -> Result<(), ParamsError> {
        self.require_setup("devnet rename")?;
        let name = name.trim();
        if self.devnet_name == name {
            return Ok(());
        }
        self.devnet = if self.active == Some(Network::Devnet) {
            Some(self.build_devnet(name)?)
        } else {
            None
        };
        self.devnet_name = name.to_string();
        Ok(())
    }

    /// Resolves `token` and makes it the active network. An unknown token
    /// leaves the previous selection in place.
    pub fn select_network(&mut self, token: &str) -> Result<Arc<ChainParams>, ParamsError> {
        let network = parse_network(token)?;
        self.select(network)
    }

    pub fn select(&mut self, network: Network) -> Result<Arc<ChainParams>, ParamsError> {
        if self.phase == Phase::Running && self.active != Some(network) {
            return Err(ParamsError::Sealed {
                operation: "network selection",
            });
        }
        if network == Network::Devnet && self.devnet.is_none() {
            self.devnet = Some(self.build_devnet(&self.devnet_name)?);
        }
        let params = self.params(network)?;
        if self.active != Some(network) {
            if let Some(previous) = self.active {
                log_warn!("switching active network from {previous} to {network}");
            }
            self.active = Some(network);
            polisd_log::set_context(Some(network.as_str()));
            log_info!("selected {network} network");
        }
        Ok(params)
    }

    pub fn active_params(&self) -> Result<Arc<ChainParams>, ParamsError> {
        let network = self.active.ok_or(ParamsError::NotSelected)?;
        self.params(network)
    }

    /// Looks up a profile without changing the selection.
    pub fn params_for(&self, token: &str) -> Result<Arc<ChainParams>, ParamsError> {
        self.params(parse_network(token)?)
    }

    pub fn params(&self, network: Network) -> Result<Arc<ChainParams>, ParamsError> {
        let params = match network {
            Network::Main => &self.main,
            Network::Testnet => &self.testnet,
            Network::Regtest => &self.regtest,
            Network::Devnet => self.devnet.as_ref().ok_or(ParamsError::DevnetNotSelected)?,
        };
        Ok(Arc::clone(params))
    }

    /// Ends the setup phase.
    pub fn seal(&mut self) -> Result<Arc<ChainParams>, ParamsError> {
        let params = self.active_params()?;
        if self.phase == Phase::Setup {
            self.phase = Phase::Running;
            log_info!("parameters sealed for {}", params.network);
        }
        Ok(params)
    }

    pub fn update_regtest_deployment(
        &mut self,
        pos: DeploymentPos,
        update: DeploymentUpdate,
    ) -> Result<(), ParamsError> {
        self.require_setup("deployment update")?;
        update_regtest_deployment(Arc::make_mut(&mut self.regtest), pos, update)
    }

    pub fn update_regtest_dip3(
        &mut self,
        activation_height: i32,
        enforcement_height: i32,
    ) -> Result<(), ParamsError> {
        self.require_setup("dip3 update")?;
        update_regtest_dip3(
            Arc::make_mut(&mut self.regtest),
            activation_height,
            enforcement_height,
        )
    }

    pub fn update_regtest_budget(&mut self, schedule: BudgetSchedule) -> Result<(), ParamsError> {
        self.require_setup("budget update")?;
        update_regtest_budget(Arc::make_mut(&mut self.regtest), schedule)
    }

    pub fn update_devnet_subsidy_and_diff(&mut self, knobs: DevnetKnobs) -> Result<(), ParamsError> {
        self.require_setup("subsidy and difficulty update")?;
        let devnet = self.devnet.as_mut().ok_or(ParamsError::DevnetNotSelected)?;
        update_devnet_subsidy_and_diff(Arc::make_mut(devnet), knobs)
    }

    fn build_devnet(&self, name: &str) -> Result<Arc<ChainParams>, ParamsError> {
        let params = build_chain_params(Network::Devnet, self.hasher.as_ref(), name)?;
        Ok(Arc::new(params))
    }

    fn require_setup(&self, operation: &'static str) -> Result<(), ParamsError> {
        match self.phase {
            Phase::Setup => Ok(()),
            Phase::Running => Err(ParamsError::Sealed { operation }),
        }
    }
}

fn parse_network(token: &str) -> Result<Network, ParamsError> {
    Network::from_token(token).ok_or_else(|| ParamsError::UnknownNetwork(token.to_string()))
}
