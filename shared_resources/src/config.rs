use std::fs;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use crate::cabin_state::CabinState;
use crate::level::{Level, LevelError};

pub const NUM_CABINS: usize = 2;

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid initial level: {0}")]
    InitialLevel(#[from] LevelError),
    #[error("duration `{0}` must be a finite, non-negative number of seconds")]
    Duration(&'static str),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BuildingConfigFile {
    pub initial_level: u8,
}

impl Default for BuildingConfigFile {
    fn default() -> Self {
        BuildingConfigFile { initial_level: Level::MIN.get() }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TimingConfigFile {
    pub moving_secs: f64,
    pub opening_doors_secs: f64,
    pub idle_open_secs: f64,
    pub closing_doors_secs: f64,
    pub idle_poll_secs: f64,
}

impl Default for TimingConfigFile {
    fn default() -> Self {
        TimingConfigFile {
            moving_secs: 2.0,
            opening_doors_secs: 2.0,
            idle_open_secs: 2.0,
            closing_doors_secs: 2.0,
            idle_poll_secs: 1.0,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub building: BuildingConfigFile,
    pub timing: TimingConfigFile,
}

#[derive(Debug, Clone, Copy)]
pub struct BuildingConfig {
    pub initial_level: Level,
}

/// How long each cabin state lasts, plus how often an idle cabin looks for work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub moving: Duration,
    pub opening_doors: Duration,
    pub idle_open: Duration,
    pub closing_doors: Duration,
    pub idle_poll: Duration,
}

impl Timing {
    /// Nominal pacing delay for `state`. `IdleClosed` is not a timed step.
    pub fn duration(&self, state: CabinState) -> Option<Duration> {
        match state {
            CabinState::MovingUp | CabinState::MovingDown => Some(self.moving),
            CabinState::OpeningDoors => Some(self.opening_doors),
            CabinState::IdleOpen => Some(self.idle_open),
            CabinState::ClosingDoors => Some(self.closing_doors),
            CabinState::IdleClosed => None,
        }
    }

    pub fn uniform(step: Duration, idle_poll: Duration) -> Self {
        Timing {
            moving: step,
            opening_doors: step,
            idle_open: step,
            closing_doors: step,
            idle_poll,
        }
    }

    /// Multiplies every duration by `factor`. Fails when a result does not fit in a `Duration`.
    pub fn scaled(&self, factor: f64) -> Result<Self, ConfigError> {
        let scale = |name, d: Duration| secs(name, d.as_secs_f64() * factor);
        Ok(Timing {
            moving: scale("moving_secs", self.moving)?,
            opening_doors: scale("opening_doors_secs", self.opening_doors)?,
            idle_open: scale("idle_open_secs", self.idle_open)?,
            closing_doors: scale("closing_doors_secs", self.closing_doors)?,
            idle_poll: scale("idle_poll_secs", self.idle_poll)?,
        })
    }
}

impl Default for Timing {
    fn default() -> Self {
        TimingConfigFile::default()
            .resolve()
            .unwrap_or_else(|_| Timing::uniform(Duration::from_secs(2), Duration::from_secs(1)))
    }
}

impl TimingConfigFile {
    fn resolve(&self) -> Result<Timing, ConfigError> {
        Ok(Timing {
            moving: secs("moving_secs", self.moving_secs)?,
            opening_doors: secs("opening_doors_secs", self.opening_doors_secs)?,
            idle_open: secs("idle_open_secs", self.idle_open_secs)?,
            closing_doors: secs("closing_doors_secs", self.closing_doors_secs)?,
            idle_poll: secs("idle_poll_secs", self.idle_poll_secs)?,
        })
    }
}

fn secs(name: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::Duration(name))
}

#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    pub building: BuildingConfig,
    pub timing: Timing,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            building: BuildingConfig { initial_level: Level::MIN },
            timing: Timing::default(),
        }
    }
}

impl DispatcherConfig {
    /// Reads the configuration named on the command line (or `config.json`),
    /// falling back to built-in defaults when no file exists.
    pub fn get() -> Result<Self, ConfigError> {
        let args = parse_env_args(env::args().skip(1).collect());
        let config_file = match &args.config_path {
            Some(path) => read_config_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => read_config_file(Path::new(DEFAULT_CONFIG_PATH))?,
            None => {
                info!("No configuration file provided, using default settings...");
                ConfigFile::default()
            }
        };
        let config = Self::from_file(&config_file)?;
        Ok(match args.time_scale {
            Some(factor) => DispatcherConfig { timing: config.timing.scaled(factor)?, ..config },
            None => config,
        })
    }

    pub fn from_file(config_file: &ConfigFile) -> Result<Self, ConfigError> {
        Ok(DispatcherConfig {
            building: BuildingConfig {
                initial_level: Level::new(config_file.building.initial_level)?,
            },
            timing: config_file.timing.resolve()?,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config_file: ConfigFile = serde_json::from_str(contents)?;
        Self::from_file(&config_file)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let config_contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&config_contents)?)
}

#[derive(Debug, Default, PartialEq)]
struct EnvArgs {
    config_path: Option<PathBuf>,
    time_scale: Option<f64>,
}

fn parse_env_args(args: Vec<String>) -> EnvArgs {
    let mut env_args = EnvArgs::default();

    for arg_pair in args.chunks_exact(2) {
        match arg_pair[0].as_str() {
            "--config" => {
                env_args.config_path = Some(PathBuf::from(&arg_pair[1]));
            },
            "--time-scale" => {
                env_args.time_scale = match arg_pair[1].parse::<f64>() {
                    Ok(factor) if factor.is_finite() && factor >= 0.0 => Some(factor),
                    _ => {
                        warn!("time scale {} is not a non-negative number, skipping...", arg_pair[1]);
                        env_args.time_scale
                    },
                };
            },
            _ => warn!("illegal argument {}, skipping...", arg_pair[0]),
        }
    }
    env_args
}
