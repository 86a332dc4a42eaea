use serde::Deserialize;
use std::{fs, path::Path};

/// Amount distributed by `--distribute` when no explicit `--amount`
/// is given.
const DEFAULT_TOTAL: f64 = 9902.53;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Default proportional total, an explicit field rather than a
    /// constant buried in the distribution code.
    #[serde(default = "default_total")]
    pub default_total: f64,
}

fn default_total() -> f64 {
    DEFAULT_TOTAL
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_total: default_total(),
        }
    }
}

impl Config {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
