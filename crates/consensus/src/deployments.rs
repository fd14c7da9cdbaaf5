//! Version-bits soft-fork deployments.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum DeploymentPos {
    TestDummy = 0,
    /// BIP68, BIP112 and BIP113.
    Csv = 1,
    Dip0001 = 2,
    Bip147 = 3,
    Dip0003 = 4,
    Dip0008 = 5,
}

pub const MAX_VERSION_BITS_DEPLOYMENTS: usize = 6;

pub const ALL_DEPLOYMENTS: [DeploymentPos; MAX_VERSION_BITS_DEPLOYMENTS] = [
    DeploymentPos::TestDummy,
    DeploymentPos::Csv,
    DeploymentPos::Dip0001,
    DeploymentPos::Bip147,
    DeploymentPos::Dip0003,
    DeploymentPos::Dip0008,
];

/// Highest bit a deployment may signal on; bits 29..31 are the version-bits marker.
pub const MAX_SIGNAL_BIT: u8 = 28;

/// Start time that never arrives (0xFFFFFFFF seconds).
pub const NEVER32: i64 = 0xFFFF_FFFF;

impl DeploymentPos {
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        DEPLOYMENT_INFO[self.as_usize()].name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_DEPLOYMENTS
            .iter()
            .copied()
            .find(|pos| DEPLOYMENT_INFO[pos.as_usize()].name == name)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Deployment {
    pub bit: u8,
    pub start_time: i64,
    pub timeout: i64,
    /// Signalling window override; `None` uses the network's miner confirmation window.
    pub window_size: Option<i64>,
    /// Signalling threshold override; `None` uses the network's rule change threshold.
    pub threshold: Option<i64>,
}

impl Deployment {
    pub const ALWAYS_ACTIVE: i64 = -1;
    pub const NO_TIMEOUT: i64 = i64::MAX;

    pub const fn new(bit: u8, start_time: i64, timeout: i64) -> Self {
        Self {
            bit,
            start_time,
            timeout,
            window_size: None,
            threshold: None,
        }
    }

    pub const fn with_window(mut self, window_size: i64, threshold: i64) -> Self {
        self.window_size = Some(window_size);
        self.threshold = Some(threshold);
        self
    }

    pub fn is_always_active(&self) -> bool {
        self.start_time == Self::ALWAYS_ACTIVE
    }

    pub fn never_starts(&self) -> bool {
        self.start_time == NEVER32
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DeploymentInfo {
    pub name: &'static str,
    /// Whether miners may ignore the rule in block templates.
    pub gbt_force: bool,
}

pub const DEPLOYMENT_INFO: [DeploymentInfo; MAX_VERSION_BITS_DEPLOYMENTS] = [
    DeploymentInfo {
        name: "testdummy",
        gbt_force: true,
    },
    DeploymentInfo {
        name: "csv",
        gbt_force: true,
    },
    DeploymentInfo {
        name: "dip0001",
        gbt_force: true,
    },
    DeploymentInfo {
        name: "bip147",
        gbt_force: true,
    },
    DeploymentInfo {
        name: "dip0003",
        gbt_force: true,
    },
    DeploymentInfo {
        name: "dip0008",
        gbt_force: true,
    },
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeploymentError {
    BitOutOfRange { pos: DeploymentPos, bit: u8 },
    DuplicateBit { first: DeploymentPos, second: DeploymentPos, bit: u8 },
    ThresholdAboveWindow { pos: DeploymentPos },
}

impl std::fmt::Display for DeploymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentError::BitOutOfRange { pos, bit } => {
                write!(f, "deployment {} signals on bit {bit} (max {MAX_SIGNAL_BIT})", pos.name())
            }
            DeploymentError::DuplicateBit { first, second, bit } => write!(
                f,
                "deployments {} and {} both signal on bit {bit}",
                first.name(),
                second.name()
            ),
            DeploymentError::ThresholdAboveWindow { pos } => {
                write!(f, "deployment {} threshold exceeds its window", pos.name())
            }
        }
    }
}

impl std::error::Error for DeploymentError {}

/// Checks signalling bits are in range and pairwise distinct.
pub fn validate_deployments(
    deployments: &[Deployment; MAX_VERSION_BITS_DEPLOYMENTS],
) -> Result<(), DeploymentError> {
    for (i, pos) in ALL_DEPLOYMENTS.iter().enumerate() {
        let deployment = &deployments[pos.as_usize()];
        if deployment.bit > MAX_SIGNAL_BIT {
            return Err(DeploymentError::BitOutOfRange {
                pos: *pos,
                bit: deployment.bit,
            });
        }
        if let (Some(window), Some(threshold)) = (deployment.window_size, deployment.threshold) {
            if threshold > window {
                return Err(DeploymentError::ThresholdAboveWindow { pos: *pos });
            }
        }
        for other in ALL_DEPLOYMENTS.iter().skip(i + 1) {
            if deployments[other.as_usize()].bit == deployment.bit {
                return Err(DeploymentError::DuplicateBit {
                    first: *pos,
                    second: *other,
                    bit: deployment.bit,
                });
            }
        }
    }
    Ok(())
}
