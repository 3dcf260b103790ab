use std::sync::Arc;

use indexmap::IndexMap;

use crate::client::HawkularClient;
use crate::metric::{AvailabilityMetric, Counter, Gauge, Logger, Watch};
use crate::tag::{Tag, TagSet};

/// Names a metric from ordered segments, tagging it with each of them.
///
/// ```no_run
/// # use metrics_exporter_hawkular::HawkularClientBuilder;
/// # let client = HawkularClientBuilder::new("tenant").build().unwrap();
/// // gauge "discovery.hal.heat", tagged with ship, unit and metric
/// let gauge = client
///     .metric_builder()
///     .add_segment("ship", "discovery")
///     .add_segment("unit", "hal")
///     .add_segment("metric", "heat")
///     .to_gauge();
/// ```
pub struct MetricBuilder<'a> {
    client: &'a HawkularClient,
    segments: IndexMap<String, String>,
    tags: TagSet,
    separator: String,
}

impl<'a> MetricBuilder<'a> {
    pub fn new(client: &'a HawkularClient) -> Self {
        MetricBuilder {
            client,
            segments: IndexMap::new(),
            tags: TagSet::empty(),
            separator: ".".to_string(),
        }
    }

    /// Appends a name segment. A segment with an existing key replaces it in place.
    #[must_use]
    pub fn add_segment<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (key, value) = (key.into(), value.into());
        self.tags.add(Tag::new(key.clone(), value.clone()));
        self.segments.insert(key, value);
        self
    }

    /// Adds a tag that is not part of the name.
    #[must_use]
    pub fn add_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.add(Tag::new(key, value));
        self
    }

    #[must_use]
    pub fn separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn name(&self) -> String {
        let segments: Vec<&str> = self.segments.values().map(String::as_str).collect();
        segments.join(&self.separator)
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn to_gauge(&self) -> Arc<Gauge> {
        self.client.gauge_with_tags(&self.name(), &self.tags)
    }

    pub fn to_counter(&self) -> Arc<Counter> {
        self.client.counter_with_tags(&self.name(), &self.tags)
    }

    pub fn to_watch(&self) -> Arc<Watch> {
        self.client.watch_with_tags(&self.name(), &self.tags)
    }

    pub fn to_availability(&self) -> Arc<AvailabilityMetric> {
        self.client.availability_with_tags(&self.name(), &self.tags)
    }

    pub fn to_logger(&self) -> Arc<Logger> {
        self.client.logger_with_tags(&self.name(), &self.tags)
    }
}
