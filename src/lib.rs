//! A client for registering tagged metrics and pushing them to Hawkular Metrics.
//!
//! ## Basics
//!
//! `metrics-exporter-hawkular` hands out named metric handles (gauges, counters, watches,
//! availabilities and string loggers) and posts every emitted value to a Hawkular Metrics server
//! over HTTP.
//!
//! ## High-level features
//!
//! - tags resolved per metric from global tags, regex rules, per-metric tags and call-site tags
//! - tags pushed once per metric, when it is first created
//! - data point tags sent inline with values
//! - in-memory failover cache for requests the server did not accept
//! - YAML configuration, see [`HawkularConfig`] and [`HawkularFactory`]
//! - periodic CPU and memory sampling through a [`MonitoringSession`]
//! - a [`metrics`]-compatible recorder reporting through the same client
//!
//! ## Behavior
//!
//! - A metric is identified by its prefixed name within its kind. Creating it again returns the
//!   existing handle and ignores the tags given
//! - Tags are resolved from lowest to highest precedence: global tags, matching regex rules in
//!   registration order, per-metric tags of the exact name, call-site tags
//! - Regex rules match whole metric names only
//! - Values are pushed as soon as they are emitted, on the emitting thread. Sending may block.
//!   Inside a Tokio runtime, the default transport steps out of the async context to block
//! - Transport failures are never reported to the emitting code: they are logged and the request
//!   is kept for retry before the next send
//!
//! ## Usage
//!
//! ```no_run
//! use metrics_exporter_hawkular::{HawkularClientBuilder, TagSet};
//!
//! let client = HawkularClientBuilder::new("my-tenant")
//!     .uri("http://hawkular:8080")
//!     .expect("invalid uri")
//!     .prefixed_with("myapp.")
//!     .add_global_tag("host", "hal")
//!     .add_metric_tag("/.*\\.heat/", "unit", "celsius")
//!     .build()
//!     .expect("failed to build client");
//!
//! // tagged {host: hal, unit: celsius, sensor: core} on creation
//! let gauge = client.gauge_with_tags("core.heat", &TagSet::singleton("sensor", "core"));
//! gauge.set(42.0);
//!
//! // the same handle, no new tagging call
//! let gauge = client.gauge("core.heat");
//! gauge.set_with_tags(43.0, &TagSet::singleton("phase", "boot"));
//! ```
//!
//! Metrics recorded through the [`metrics`] macros can be reported by the same client:
//!
//! ```ignore
//! ReporterBuilder::new(client)
//!     .with_interval(Duration::from_secs(10))?
//!     .install()?;
//!
//! metrics::counter!("jobs.done").increment(1);
//! ```
mod common;
pub use self::common::{BuildError, ConfigError, HawkularType, MetricDescriptor, TransportError};

mod tag;
pub use self::tag::{Tag, TagSet};

mod rule;
pub use self::rule::{tags_for_name, RegexTagRule};

mod resolver;
pub use self::resolver::TagResolver;

mod registry;

pub mod metric;
pub use self::metric::{
    Availability, AvailabilityMetric, Counter, DataPoint, Gauge, Logger, Metric, Value, Watch,
};

mod notifier;
pub use self::notifier::{ChangeListener, MetricsNotifier};

pub mod formatting;

pub mod transport;
pub use self::transport::{HttpTransport, ReqwestTransport, TransportOptions};

mod config;
pub use self::config::HawkularConfig;

mod builder;
pub use self::builder::HawkularClientBuilder;

mod client;
pub use self::client::{ClientInfo, HawkularClient};

mod factory;
pub use self::factory::{HawkularFactory, CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH};

mod segmented;
pub use self::segmented::MetricBuilder;

mod logger;
pub use self::logger::{HawkularLogger, Severity};

pub mod monitor;
pub use self::monitor::{
    CpuMonitoring, Feeder, FeederSet, MemoryMonitoring, MonitoringSession,
    MonitoringSessionBuilder,
};

mod recorder;
pub use self::recorder::{HawkularHandle, HawkularRecorder};

mod reporter;
pub use self::reporter::ReporterBuilder;
