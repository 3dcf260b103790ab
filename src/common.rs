use std::fmt;

use thiserror::Error;

/// Errors that could occur while building or installing a client, a monitoring session or a
/// reporter.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The base URI of the Hawkular server could not be parsed.
    #[error("invalid hawkular uri: {0}")]
    InvalidUri(String),

    /// A configured header name or value is not valid HTTP.
    #[error("invalid http header '{0}'")]
    InvalidHeader(String),

    /// A regex tag pattern could not be compiled.
    #[error("invalid regex tag pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to create http client: {0}")]
    FailedToCreateHttpClient(String),

    /// Creating the Tokio runtime failed.
    #[error("failed to create Tokio runtime: {0}")]
    FailedToCreateRuntime(String),

    /// Installing the recorder did not succeed.
    #[error("failed to install exporter as global recorder: {0}")]
    FailedToSetGlobalRecorder(String),

    /// A periodic task was given a zero period.
    #[error("frequency must be greater than zero")]
    InvalidFrequency,

    /// Quantiles were empty.
    #[error("quantiles cannot be empty")]
    EmptyQuantiles,
}

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised by the HTTP transport. They never reach metric emitters.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("hawkular answered with status {0}")]
    Status(u16),
}

/// Wire-level metric kind discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HawkularType {
    Gauges,
    Counters,
    Availability,
    Strings,
}

impl HawkularType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gauges => "gauges",
            Self::Counters => "counters",
            Self::Availability => "availability",
            Self::Strings => "strings",
        }
    }
}

impl fmt::Display for HawkularType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a registered metric: its kind and its fully-qualified name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MetricDescriptor {
    hawkular_type: HawkularType,
    name: String,
}

impl MetricDescriptor {
    pub fn new<N: Into<String>>(hawkular_type: HawkularType, name: N) -> Self {
        MetricDescriptor {
            hawkular_type,
            name: name.into(),
        }
    }

    pub fn hawkular_type(&self) -> HawkularType {
        self.hawkular_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
