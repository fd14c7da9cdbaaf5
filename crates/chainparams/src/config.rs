//! Node options from a `key=value` file and command-line arguments.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use polisd_consensus::{DeploymentPos, Network};
use polisd_log::{log_warn, Format, Level, LogConfig};

use crate::chain::ChainParams;
use crate::error::ParamsError;
use crate::overrides::{BudgetSchedule, DeploymentUpdate, DevnetKnobs};
use crate::registry::ParamsRegistry;

pub type ConfMap = HashMap<String, Vec<String>>;

const KNOWN_KEYS: [&str; 13] = [
    "network",
    "testnet",
    "regtest",
    "devnet",
    "vbparams",
    "budgetparams",
    "dip3params",
    "minimumdifficultyblocks",
    "highsubsidyblocks",
    "highsubsidyfactor",
    "loglevel",
    "logformat",
    "logtimestamps",
];

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
    MissingValue(String),
    InvalidValue {
        key: String,
        value: String,
    },
    ConflictingNetworks {
        first: Network,
        second: Network,
    },
    Params(ParamsError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, error } => write!(f, "{}: {error}", path.display()),
            ConfigError::MissingValue(key) => write!(f, "option {key} needs a value"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value '{value}' for {key}")
            }
            ConfigError::ConflictingNetworks { first, second } => {
                write!(f, "cannot select both {first} and {second}")
            }
            ConfigError::Params(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { error, .. } => Some(error),
            ConfigError::Params(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParamsError> for ConfigError {
    fn from(err: ParamsError) -> Self {
        ConfigError::Params(err)
    }
}

/// Reads an options file. A missing file is not an error.
pub fn load_conf_file(path: &Path) -> Result<Option<ConfMap>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(parse_conf(&contents))),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            error,
        }),
    }
}

/// `key=value` lines; `#` and `;` start comments; a bare key is an enabled flag.
pub fn parse_conf(contents: &str) -> ConfMap {
    let mut out = ConfMap::new();
    for raw_line in contents.lines() {
        let line = raw_line
            .split(['#', ';'])
            .next()
            .unwrap_or_default()
            .trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once('=').unwrap_or((line, ""));
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        out.entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.trim().to_string());
    }
    out
}

/// Accepts `-key`, `-key=value`, `--key=value` and `--key value`.
pub fn parse_args<I>(args: I) -> Result<ConfMap, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = ConfMap::new();
    let mut args = args.into_iter().peekable();
    while let Some(arg) = args.next() {
        let Some(stripped) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            return Err(ConfigError::InvalidValue {
                key: "argument".to_string(),
                value: arg.clone(),
            });
        };
        let (key, value) = match stripped.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None if arg.starts_with("--") && takes_value(stripped) => {
                let value = args
                    .next_if(|next| !next.starts_with('-'))
                    .ok_or_else(|| ConfigError::MissingValue(stripped.to_string()))?;
                (stripped.to_string(), value)
            }
            None => (stripped.to_string(), String::new()),
        };
        if key.is_empty() {
            return Err(ConfigError::MissingValue(arg));
        }
        out.entry(key.to_ascii_lowercase()).or_default().push(value);
    }
    Ok(out)
}

fn takes_value(key: &str) -> bool {
    !matches!(
        key.to_ascii_lowercase().as_str(),
        "testnet" | "regtest" | "devnet" | "logtimestamps"
    )
}

pub fn parse_conf_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() {
        return Some(true);
    }
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeOptions {
    pub network: Network,
    /// Raw devnet name; `Some("")` selects the unnamed `devnet`.
    pub devnet_name: Option<String>,
    pub deployments: Vec<(DeploymentPos, DeploymentUpdate)>,
    pub budget: Option<BudgetSchedule>,
    pub dip3: Option<(i32, i32)>,
    pub devnet_knobs: Option<DevnetKnobs>,
    pub log: LogConfig,
    pub unknown_keys: Vec<String>,
}

impl NodeOptions {
    /// Reads `conf_path` (if given) and `args`; keys given as arguments replace
    /// the file's values for that key.
    pub fn load<I>(conf_path: Option<&Path>, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut map = match conf_path {
            Some(path) => load_conf_file(path)?.unwrap_or_default(),
            None => ConfMap::new(),
        };
        map.extend(parse_args(args)?);
        Self::from_map(&map)
    }

    pub fn from_map(map: &ConfMap) -> Result<Self, ConfigError> {
        let (network, devnet_name) = resolve_network(map)?;

        let deployments = map
            .get("vbparams")
            .map(|values| {
                values
                    .iter()
                    .map(|value| parse_vbparams(value))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let budget = last(map, "budgetparams")
            .map(|value| {
                let parts = parse_ints::<i32>("budgetparams", value, 3)?;
                Ok::<_, ConfigError>(BudgetSchedule {
                    masternode_payments_start: parts[0],
                    budget_payments_start: parts[1],
                    superblock_start: parts[2],
                })
            })
            .transpose()?;

        let dip3 = last(map, "dip3params")
            .map(|value| parse_ints::<i32>("dip3params", value, 2).map(|p| (p[0], p[1])))
            .transpose()?;

        let min_difficulty = parse_int(map, "minimumdifficultyblocks")?;
        let high_blocks = parse_int(map, "highsubsidyblocks")?;
        let high_factor = parse_int(map, "highsubsidyfactor")?;
        let devnet_knobs = (min_difficulty.is_some() || high_blocks.is_some() || high_factor.is_some())
            .then(|| DevnetKnobs {
                minimum_difficulty_blocks: min_difficulty.unwrap_or(0),
                high_subsidy_blocks: high_blocks.unwrap_or(0),
                high_subsidy_factor: high_factor.unwrap_or(1),
            });

        let mut unknown_keys: Vec<String> = map
            .keys()
            .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        unknown_keys.sort();

        Ok(Self {
            network,
            devnet_name,
            deployments,
            budget,
            dip3,
            devnet_knobs,
            log: parse_log_config(map)?,
            unknown_keys,
        })
    }

    /// Configures logging, selects the network and applies the test-network
    /// overrides. Must run during the registry's setup phase.
    pub fn apply(&self, registry: &mut ParamsRegistry) -> Result<Arc<ChainParams>, ConfigError> {
        polisd_log::init(self.log);
        for key in &self.unknown_keys {
            log_warn!("ignoring unknown option {key}");
        }

        let network = self.network;
        let regtest_only = !self.deployments.is_empty() || self.budget.is_some() || self.dip3.is_some();
        if regtest_only && network != Network::Regtest {
            return Err(ParamsError::WrongNetwork {
                operation: "regtest parameter override",
                network,
            }
            .into());
        }
        if self.devnet_knobs.is_some() && network != Network::Devnet {
            return Err(ParamsError::WrongNetwork {
                operation: "subsidy and difficulty update",
                network,
            }
            .into());
        }

        if let Some(name) = &self.devnet_name {
            registry.set_devnet_name(name)?;
        }
        registry.select(network)?;

        for (pos, update) in &self.deployments {
            registry.update_regtest_deployment(*pos, *update)?;
        }
        if let Some((activation, enforcement)) = self.dip3 {
            registry.update_regtest_dip3(activation, enforcement)?;
        }
        if let Some(schedule) = self.budget {
            registry.update_regtest_budget(schedule)?;
        }
        if let Some(knobs) = self.devnet_knobs {
            registry.update_devnet_subsidy_and_diff(knobs)?;
        }
        Ok(registry.active_params()?)
    }
}

fn last<'a>(map: &'a ConfMap, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(|values| values.last())
        .map(String::as_str)
}

fn flag(map: &ConfMap, key: &str) -> Result<bool, ConfigError> {
    match last(map, key) {
        None => Ok(false),
        Some(value) => parse_conf_bool(value).ok_or_else(|| invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn resolve_network(map: &ConfMap) -> Result<(Network, Option<String>), ConfigError> {
    let mut chosen: Vec<Network> = Vec::new();
    if let Some(token) = last(map, "network") {
        chosen.push(Network::from_token(token).ok_or_else(|| invalid("network", token))?);
    }
    if flag(map, "testnet")? {
        chosen.push(Network::Testnet);
    }
    if flag(map, "regtest")? {
        chosen.push(Network::Regtest);
    }
    let devnet_name = last(map, "devnet").map(str::to_string);
    if devnet_name.is_some() {
        chosen.push(Network::Devnet);
    }

    let Some(first) = chosen.first().copied() else {
        return Ok((Network::Main, None));
    };
    if let Some(second) = chosen.iter().copied().find(|network| *network != first) {
        return Err(ConfigError::ConflictingNetworks { first, second });
    }
    Ok((first, devnet_name))
}

fn parse_ints<T: std::str::FromStr>(
    key: &str,
    value: &str,
    count: usize,
) -> Result<Vec<T>, ConfigError> {
    let parts: Vec<T> = value
        .split(':')
        .map(|part| part.trim().parse::<T>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid(key, value))?;
    if parts.len() != count {
        return Err(invalid(key, value));
    }
    Ok(parts)
}

fn parse_int(map: &ConfMap, key: &str) -> Result<Option<i32>, ConfigError> {
    last(map, key)
        .map(|value| value.trim().parse::<i32>().map_err(|_| invalid(key, value)))
        .transpose()
}

/// `<deployment>:<start>:<timeout>[:<window>:<threshold>]`
fn parse_vbparams(value: &str) -> Result<(DeploymentPos, DeploymentUpdate), ConfigError> {
    let (name, rest) = value
        .split_once(':')
        .ok_or_else(|| invalid("vbparams", value))?;
    let pos = DeploymentPos::from_name(name.trim()).ok_or_else(|| invalid("vbparams", value))?;
    let numbers = match rest.matches(':').count() {
        1 => parse_ints::<i64>("vbparams", rest, 2)?,
        3 => parse_ints::<i64>("vbparams", rest, 4)?,
        _ => return Err(invalid("vbparams", value)),
    };
    let update = match numbers.as_slice() {
        [start, timeout] => DeploymentUpdate::new(*start, *timeout),
        [start, timeout, window, threshold] => {
            DeploymentUpdate::from_raw(*start, *timeout, *window, *threshold)
        }
        _ => return Err(invalid("vbparams", value)),
    };
    Ok((pos, update))
}

fn parse_log_config(map: &ConfMap) -> Result<LogConfig, ConfigError> {
    let mut config = LogConfig::default();
    if let Some(value) = last(map, "loglevel") {
        config.level = Level::parse(value).ok_or_else(|| invalid("loglevel", value))?;
    }
    if let Some(value) = last(map, "logformat") {
        config.format = Format::parse(value).ok_or_else(|| invalid("logformat", value))?;
    }
    if map.contains_key("logtimestamps") {
        config.timestamps = flag(map, "logtimestamps")?;
    }
    Ok(config)
}
