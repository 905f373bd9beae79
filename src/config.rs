use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{DEFAULT_INPUTS, DEFAULT_RADIX, ENV_PREFIX, MAX_BASE, MIN_BASE};
use crate::input::SharePolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Share files to solve when none are named on the command line.
    pub inputs: Vec<PathBuf>,
    pub on_invalid_share: SharePolicy,
    /// Radix the secrets are printed in.
    pub radix: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            inputs: DEFAULT_INPUTS.iter().map(PathBuf::from).collect(),
            on_invalid_share: SharePolicy::default(),
            radix: DEFAULT_RADIX,
        }
    }
}

impl SolverConfig {
    /// Loads `<path>/conf.toml`, writing a default one first if it does not exist.
    ///
    /// Values can be overridden from the environment, eg. `SHARDSOLVE_RADIX=16` or
    /// `SHARDSOLVE_ON_INVALID_SHARE=skip`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(path.as_ref(), ENV_PREFIX)
    }

    fn load(config_path: &Path, env_prefix: &str) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            fs::create_dir_all(config_path).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        }

        let conf_file = config_path.join("conf.toml");
        if !conf_file.exists() {
            let toml = toml::to_string_pretty(&SolverConfig::default())
                .map_err(|err| ConfigError::Foreign(Box::new(err)))?;
            fs::write(&conf_file, toml).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        }

        debug!("📝 Loaded config at path: {:#?}", conf_file);
        let settings = Config::builder()
            .add_source(config::File::from(conf_file.as_path()))
            .add_source(config::Environment::with_prefix(env_prefix))
            .build()?;

        settings.try_into()
    }
}

impl TryFrom<Config> for SolverConfig {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let inputs = config
            .get_array("inputs")?
            .into_iter()
            .map(|v| v.into_string().map(PathBuf::from))
            .collect::<Result<Vec<_>, _>>()?;

        let on_invalid_share = config
            .get_string("on_invalid_share")?
            .parse::<SharePolicy>()
            .map_err(ConfigError::Message)?;

        let radix = config.get_int("radix")?;
        let radix = u32::try_from(radix)
            .ok()
            .filter(|r| (MIN_BASE..=MAX_BASE).contains(r))
            .ok_or_else(|| ConfigError::Message(format!("radix {radix} is not in [2, 36]")))?;

        Ok(SolverConfig {
            inputs,
            on_invalid_share,
            radix,
        })
    }
}
