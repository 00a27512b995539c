use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::instrument_catalog::default_seeds;
use crate::model::InstrumentSeed;
use crate::simulator::{validate_seeds, DEFAULT_WINDOW_LEN};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "MARKET_SCANNER_CONFIG";
pub const SEED_ENV: &str = "MARKET_SCANNER_SEED";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub instruments: Vec<InstrumentSeed>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,
    #[serde(default = "default_window_len")]
    pub window_len: usize,
    #[serde(default = "default_true")]
    pub start_live: bool,
    /// Fixed RNG seed; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            window_len: DEFAULT_WINDOW_LEN,
            start_live: true,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Print one JSON frame per tick on stdout.
    #[serde(default = "default_true")]
    pub json_snapshots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_snapshots: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_refresh_interval() -> String {
    "2s".to_string()
}

fn default_window_len() -> usize {
    DEFAULT_WINDOW_LEN
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse an interval string ("500ms", "2s", "1m", "1h") into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64> {
    let s = s.trim();
    let (num_str, unit_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1_000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60_000)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3_600_000)
    } else {
        bail!(
            "invalid interval '{}': expected a number followed by one of ms/s/m/h",
            s
        );
    };

    if num_str.is_empty() {
        bail!("invalid interval '{}': missing quantity", s);
    }
    let n: u64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl SimulationConfig {
    pub fn refresh_interval(&self) -> Result<Duration> {
        parse_interval_ms(&self.refresh_interval).map(Duration::from_millis)
    }
}

impl Config {
    /// Load `.env`, then the TOML file named by `MARKET_SCANNER_CONFIG`
    /// (default `config/default.toml`). A missing default file means
    /// built-in defaults; a missing explicit file is an error.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(raw) = std::env::var(SEED_ENV) {
            let seed = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be an unsigned integer", SEED_ENV))?;
            config.simulation.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).context("invalid TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation
            .refresh_interval()
            .context("simulation.refresh_interval is invalid")?;
        if self.simulation.window_len == 0 {
            bail!("simulation.window_len must be > 0");
        }
        validate_seeds(&self.seeds()).context("instrument list is invalid")?;
        Ok(())
    }

    /// Configured instruments, or the built-in micro futures set when none
    /// are declared.
    pub fn seeds(&self) -> Vec<InstrumentSeed> {
        if self.instruments.is_empty() {
            default_seeds()
        } else {
            self.instruments.clone()
        }
    }
}
