//! Optional TOML configuration file and its merge with command-line flags.

use std::{
    fs, io,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    time::Duration,
};

use chaos_summoner_core::DEFAULT_DISPLAY_CAPACITY;
use chaos_summoner_system_activity::DEFAULT_DRIFT_INTERVAL;
use chaos_summoner_system_tone_synth::{DEFAULT_DURATION_SECONDS, DEFAULT_SAMPLE_RATE};
use serde::Deserialize;
use thiserror::Error;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

const SAMPLE_RATE_RANGE: RangeInclusive<u32> = 8_000..=192_000;
const MAX_EFFECT_SECONDS: f32 = 10.0;
const DRIFT_INTERVAL_RANGE: RangeInclusive<f64> = 0.01..=3_600.0;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config toml contents")]
    Parse(#[from] toml::de::Error),
    #[error(
        "unsupported config version {found}; expected {expected}",
        expected = SUPPORTED_CONFIG_VERSION
    )]
    UnsupportedVersion { found: u32 },
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue {
        key: &'static str,
        reason: &'static str,
    },
}

/// Contents of a configuration file. Every key but `version` is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    version: u32,
    seed: Option<u64>,
    display_capacity: Option<usize>,
    sample_rate: Option<u32>,
    effect_duration_seconds: Option<f32>,
    drift_interval_seconds: Option<f64>,
    drift_enabled: Option<bool>,
}

impl FileConfig {
    /// Reads and validates the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses and validates configuration file contents.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
            });
        }
        if let Some(rate) = config.sample_rate {
            if !SAMPLE_RATE_RANGE.contains(&rate) {
                return Err(ConfigError::InvalidValue {
                    key: "sample_rate",
                    reason: "must be between 8000 and 192000 hertz",
                });
            }
        }
        if let Some(seconds) = config.effect_duration_seconds {
            if !(seconds.is_finite() && seconds > 0.0 && seconds <= MAX_EFFECT_SECONDS) {
                return Err(ConfigError::InvalidValue {
                    key: "effect_duration_seconds",
                    reason: "must be more than 0 and at most 10 seconds",
                });
            }
        }
        if let Some(seconds) = config.drift_interval_seconds {
            if !DRIFT_INTERVAL_RANGE.contains(&seconds) {
                return Err(ConfigError::InvalidValue {
                    key: "drift_interval_seconds",
                    reason: "must be between 0.01 and 3600 seconds",
                });
            }
        }
        Ok(config)
    }
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) disable_drift: bool,
}

/// Fully resolved session settings.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) seed: u64,
    pub(crate) display_capacity: usize,
    pub(crate) sample_rate: u32,
    pub(crate) effect_duration_seconds: f32,
    pub(crate) drift_interval: Duration,
    pub(crate) drift_enabled: bool,
}

impl Settings {
    /// Merges the defaults, the optional file and the command-line overrides.
    ///
    /// `fallback_seed` is used when neither source names a seed.
    pub(crate) fn resolve(
        file: Option<&FileConfig>,
        overrides: Overrides,
        fallback_seed: u64,
    ) -> Self {
        let defaults = FileConfig::default();
        let file = file.unwrap_or(&defaults);

        Self {
            seed: overrides.seed.or(file.seed).unwrap_or(fallback_seed),
            display_capacity: file.display_capacity.unwrap_or(DEFAULT_DISPLAY_CAPACITY),
            sample_rate: file.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
            effect_duration_seconds: file
                .effect_duration_seconds
                .unwrap_or(DEFAULT_DURATION_SECONDS),
            drift_interval: file
                .drift_interval_seconds
                .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
                .unwrap_or(DEFAULT_DRIFT_INTERVAL),
            drift_enabled: !overrides.disable_drift && file.drift_enabled.unwrap_or(true),
        }
    }
}
