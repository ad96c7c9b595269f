use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::ConfigError;

pub const DEFAULT_COUNTRIES: &[&str] = &[
    "Spain", "Italy", "Greece", "France", "Germany", "USA", "Canada",
];

pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 500;

/// Settings threaded through every validator call.
///
/// ```yaml
/// countries: [Spain, USA, Canada]
/// submit_delay_ms: 250
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub countries: Vec<String>,
    pub submit_delay_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
        }
    }
}

impl FormConfig {
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_submit_delay_ms(mut self, delay_ms: u64) -> Self {
        self.submit_delay_ms = delay_ms;
        self
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(source.as_str())?;
        debug!(
            path = %path.display(),
            countries = config.countries.len(),
            "loaded form config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countries.is_empty() {
            return Err(ConfigError::NoCountries);
        }

        let mut seen = HashSet::new();
        for country in &self.countries {
            if !seen.insert(country.as_str()) {
                return Err(ConfigError::DuplicateCountry(country.clone()));
            }
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}
