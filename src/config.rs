use std::fs;
use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::common::ConfigError;

/// Client settings as read from a YAML file.
///
/// Every key is optional. A minimal file only names the tenant:
///
/// ```yaml
/// uri: http://hawkular:8080
/// tenant: discovery
/// prefix: "2001."
/// globalTags:
///   owner: jdoe
/// perMetricTags:
///   hal.heat:
///     unit: celsius
///   /hal\..*/:
///     ship: discovery
/// failoverCacheDuration: 60000
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HawkularConfig {
    pub uri: Option<String>,
    pub tenant: Option<String>,
    pub prefix: Option<String>,
    pub bearer_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub headers: IndexMap<String, String>,
    pub global_tags: IndexMap<String, String>,
    /// Keys are literal metric names, or patterns when written between slashes.
    pub per_metric_tags: IndexMap<String, IndexMap<String, String>>,
    /// Keys are always patterns.
    pub regex_tags: IndexMap<String, IndexMap<String, String>>,
    /// In milliseconds.
    pub failover_cache_duration: Option<u64>,
    pub failover_cache_max_size: Option<usize>,
}

impl HawkularConfig {
    pub const UNCONFIGURED_TENANT: &'static str = "unconfigured";

    /// Reads and parses the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        // an empty document is an empty configuration
        if raw.trim().is_empty() {
            return Ok(HawkularConfig::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// The configuration used when no usable file could be found.
    pub fn unconfigured() -> Self {
        HawkularConfig {
            tenant: Some(Self::UNCONFIGURED_TENANT.to_string()),
            ..HawkularConfig::default()
        }
    }

    pub fn failover_cache_duration(&self) -> Option<Duration> {
        self.failover_cache_duration.map(Duration::from_millis)
    }
}
