use std::env;
use std::path::Path;

use tracing::error;

use crate::builder::HawkularClientBuilder;
use crate::client::HawkularClient;
use crate::common::BuildError;
use crate::config::HawkularConfig;
use crate::logger::HawkularLogger;

/// Environment variable naming the configuration file read by [`HawkularFactory::load`].
pub const CONFIG_PATH_VAR: &str = "HAWKULAR_TOOLBOX_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "hawkular.yaml";

/// Creates clients from a configuration file.
///
/// A missing or malformed file is not fatal: it is logged and the factory falls back to an
/// empty configuration with the `unconfigured` tenant.
#[derive(Clone, Debug)]
pub struct HawkularFactory {
    config: HawkularConfig,
}

impl HawkularFactory {
    /// Reads the file named by `HAWKULAR_TOOLBOX_CONFIG`, or `hawkular.yaml`.
    pub fn load() -> Self {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let config = HawkularConfig::from_file(path).unwrap_or_else(|e| {
            error!(path = %path.display(), error = %e, "could not read hawkular config");
            HawkularConfig::unconfigured()
        });
        HawkularFactory { config }
    }

    pub fn from_config(config: HawkularConfig) -> Self {
        HawkularFactory { config }
    }

    pub fn config(&self) -> &HawkularConfig {
        &self.config
    }

    pub fn builder(&self) -> HawkularClientBuilder {
        HawkularClientBuilder::from_config(&self.config)
    }

    pub fn create(&self) -> Result<HawkularClient, BuildError> {
        self.builder().build()
    }

    /// Builds a logger for `owner`: its metrics are prefixed with `<owner>.` and carry the
    /// global tag `owner=<owner>`.
    pub fn logger(&self, owner: &str) -> Result<HawkularLogger, BuildError> {
        self.builder()
            .add_global_tag("owner", owner)
            .prefixed_with(format!("{owner}."))
            .build_logger()
    }
}
