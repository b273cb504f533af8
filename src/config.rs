use anyhow::Result;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub type Number = f64;

/// Length of a genuine G25 coordinate vector.
pub const G25_DIMENSIONS: usize = 25;

pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_MAX_PANEL_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_VECTORS: usize = 100_000;

#[derive(Deserialize, Default)]
pub struct G25Config {
    pub limit: Option<usize>,
    pub min_dimensions: Option<usize>,
    pub max_panel_bytes: Option<usize>,
    pub max_vectors: Option<usize>,
    pub verbose: Option<bool>,
}

impl G25Config {
    pub fn try_from(config: &Config) -> Result<Self, ConfigError> {
        Ok(G25Config {
            limit: config.get("limit").ok(),
            min_dimensions: config.get("min_dimensions").ok(),
            max_panel_bytes: config.get("max_panel_bytes").ok(),
            max_vectors: config.get("max_vectors").ok(),
            verbose: config.get("verbose").ok(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub limit: usize,
    pub min_dimensions: usize,
    pub max_panel_bytes: usize,
    pub max_vectors: usize,
    pub verbose: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            min_dimensions: G25_DIMENSIONS,
            max_panel_bytes: DEFAULT_MAX_PANEL_BYTES,
            max_vectors: DEFAULT_MAX_VECTORS,
            verbose: false,
        }
    }
}

impl State {
    /// Loads `g25_config.*` (optional) overlaid with `G25_*` environment variables.
    pub fn new() -> Result<Self> {
        let mut config = Config::default();
        #[allow(deprecated)]
        {
            config.merge(ConfigFile::with_name("g25_config").required(false))?;
            config.merge(Environment::with_prefix("G25"))?;
        }

        Self::from_config(&G25Config::try_from(&config)?)
    }

    pub fn from_config(g25_config: &G25Config) -> Result<Self> {
        let defaults = Self::default();

        let limit = g25_config.limit.unwrap_or(defaults.limit);
        let min_dimensions = g25_config
            .min_dimensions
            .unwrap_or(defaults.min_dimensions);
        let max_panel_bytes = g25_config
            .max_panel_bytes
            .unwrap_or(defaults.max_panel_bytes);
        let max_vectors = g25_config.max_vectors.unwrap_or(defaults.max_vectors);
        let verbose = g25_config.verbose.unwrap_or(defaults.verbose);

        if limit == 0 {
            anyhow::bail!("G25_LIMIT must be greater than zero.");
        }
        if max_panel_bytes == 0 {
            anyhow::bail!("G25_MAX_PANEL_BYTES must be greater than zero.");
        }
        if max_vectors == 0 {
            anyhow::bail!("G25_MAX_VECTORS must be greater than zero.");
        }

        Ok(Self {
            limit,
            min_dimensions,
            max_panel_bytes,
            max_vectors,
            verbose,
        })
    }

    pub fn print_config(&self) {
        println!("limit={}", self.limit);
        println!("min_dimensions={}", self.min_dimensions);
        println!("max_panel_bytes={}", self.max_panel_bytes);
        println!("max_vectors={}", self.max_vectors);
        println!("verbose={}", self.verbose);
    }
}
