//! Long-living masternode quorum (LLMQ) catalog.
//!
//! Each entry describes a threshold-signing topology: how many members a
//! quorum has, how many must complete the DKG for it to be usable, how many
//! shares a recovered signature needs, and the block windows in which a DKG
//! runs and its commitment may be mined. The entries are compile-time
//! constants and are checked at compile time below.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum LlmqType {
    Llmq50_60 = 1,
    Llmq400_60 = 2,
    Llmq400_85 = 3,
    /// Small quorum for regression tests only.
    Llmq10_60 = 100,
}

impl LlmqType {
    pub fn params(self) -> &'static LlmqParams {
        match self {
            LlmqType::Llmq50_60 => &LLMQ_50_60,
            LlmqType::Llmq400_60 => &LLMQ_400_60,
            LlmqType::Llmq400_85 => &LLMQ_400_85,
            LlmqType::Llmq10_60 => &LLMQ_10_60,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        ALL_LLMQ_TYPES
            .iter()
            .copied()
            .find(|llmq_type| *llmq_type as u8 == value)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_LLMQ_TYPES
            .iter()
            .copied()
            .find(|llmq_type| llmq_type.params().name == name)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LlmqParams {
    pub llmq_type: LlmqType,
    pub name: &'static str,
    pub size: u32,
    /// Minimum number of valid members for the DKG to produce a usable quorum.
    pub min_size: u32,
    /// Shares required to recover a threshold signature.
    pub threshold: u32,
    /// Blocks between two DKG sessions.
    pub dkg_interval: u32,
    pub dkg_phase_blocks: u32,
    pub dkg_mining_window_start: u32,
    pub dkg_mining_window_end: u32,
}

impl LlmqParams {
    pub const fn is_consistent(&self) -> bool {
        self.threshold > 0
            && self.threshold <= self.min_size
            && self.min_size <= self.size
            && self.dkg_mining_window_start < self.dkg_mining_window_end
            && self.dkg_mining_window_end <= self.dkg_interval
    }

    pub fn validate(&self) -> Result<(), LlmqError> {
        if self.threshold == 0 || self.threshold > self.min_size || self.min_size > self.size {
            return Err(LlmqError::Membership {
                name: self.name,
                size: self.size,
                min_size: self.min_size,
                threshold: self.threshold,
            });
        }
        if self.dkg_mining_window_start >= self.dkg_mining_window_end
            || self.dkg_mining_window_end > self.dkg_interval
        {
            return Err(LlmqError::MiningWindow {
                name: self.name,
                start: self.dkg_mining_window_start,
                end: self.dkg_mining_window_end,
                interval: self.dkg_interval,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LlmqError {
    Membership {
        name: &'static str,
        size: u32,
        min_size: u32,
        threshold: u32,
    },
    MiningWindow {
        name: &'static str,
        start: u32,
        end: u32,
        interval: u32,
    },
    Missing(LlmqType),
}

impl std::fmt::Display for LlmqError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmqError::Membership {
                name,
                size,
                min_size,
                threshold,
            } => write!(
                f,
                "quorum {name} needs 0 < threshold <= min size <= size (got {threshold}/{min_size}/{size})"
            ),
            LlmqError::MiningWindow {
                name,
                start,
                end,
                interval,
            } => write!(
                f,
                "quorum {name} mining window [{start}, {end}) does not fit interval {interval}"
            ),
            LlmqError::Missing(llmq_type) => {
                write!(f, "quorum role bound to {llmq_type:?} which is not configured")
            }
        }
    }
}

impl std::error::Error for LlmqError {}

pub const LLMQ_10_60: LlmqParams = LlmqParams {
    llmq_type: LlmqType::Llmq10_60,
    name: "llmq_10",
    size: 10,
    min_size: 6,
    threshold: 6,
    dkg_interval: 24,
    dkg_phase_blocks: 2,
    dkg_mining_window_start: 10,
    dkg_mining_window_end: 18,
};

pub const LLMQ_50_60: LlmqParams = LlmqParams {
    llmq_type: LlmqType::Llmq50_60,
    name: "llmq_50_60",
    size: 50,
    min_size: 40,
    threshold: 30,
    dkg_interval: 24,
    dkg_phase_blocks: 2,
    dkg_mining_window_start: 10,
    dkg_mining_window_end: 18,
};

pub const LLMQ_400_60: LlmqParams = LlmqParams {
    llmq_type: LlmqType::Llmq400_60,
    name: "llmq_400_51",
    size: 400,
    min_size: 300,
    threshold: 240,
    dkg_interval: 24 * 12,
    dkg_phase_blocks: 4,
    dkg_mining_window_start: 20,
    dkg_mining_window_end: 28,
};

/// Used for deployment and min-proto-version signalling, hence the higher threshold
/// and the wider mining window.
pub const LLMQ_400_85: LlmqParams = LlmqParams {
    llmq_type: LlmqType::Llmq400_85,
    name: "llmq_400_85",
    size: 400,
    min_size: 350,
    threshold: 340,
    dkg_interval: 24 * 24,
    dkg_phase_blocks: 4,
    dkg_mining_window_start: 20,
    dkg_mining_window_end: 48,
};

pub const ALL_LLMQ_TYPES: [LlmqType; 4] = [
    LlmqType::Llmq50_60,
    LlmqType::Llmq400_60,
    LlmqType::Llmq400_85,
    LlmqType::Llmq10_60,
];

const _: () = assert!(LLMQ_10_60.is_consistent());
const _: () = assert!(LLMQ_50_60.is_consistent());
const _: () = assert!(LLMQ_400_60.is_consistent());
const _: () = assert!(LLMQ_400_85.is_consistent());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_are_consistent() {
        for llmq_type in ALL_LLMQ_TYPES {
            let params = llmq_type.params();
            assert_eq!(params.llmq_type, llmq_type);
            assert!(params.validate().is_ok(), "{}", params.name);
            assert!(params.threshold <= params.size);
            assert!(params.dkg_mining_window_start < params.dkg_mining_window_end);
            assert!(params.dkg_mining_window_end <= params.dkg_interval);
        }
    }

    #[test]
    fn lookup_by_name_and_id() {
        assert_eq!(LlmqType::from_name("llmq_400_51"), Some(LlmqType::Llmq400_60));
        assert_eq!(LlmqType::from_name("llmq_10"), Some(LlmqType::Llmq10_60));
        assert_eq!(LlmqType::from_name("llmq_5_60"), None);
        assert_eq!(LlmqType::from_u8(3), Some(LlmqType::Llmq400_85));
        assert_eq!(LlmqType::from_u8(0xff), None);
    }

    #[test]
    fn validate_reports_violations() {
        let mut params = LLMQ_50_60;
        params.threshold = 45;
        assert!(matches!(
            params.validate(),
            Err(LlmqError::Membership { threshold: 45, .. })
        ));

        let mut params = LLMQ_400_85;
        params.dkg_mining_window_end = params.dkg_interval + 1;
        assert!(!params.is_consistent());
        assert!(matches!(
            params.validate(),
            Err(LlmqError::MiningWindow { .. })
        ));
    }
}
