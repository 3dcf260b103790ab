use std::sync::Arc;
use std::time::Duration;

use quanta::Clock;
use tracing::debug;

use crate::metric::{AvailabilityMetric, Counter, Gauge, Logger, Metric, Watch};
use crate::monitor::MonitoringSessionBuilder;
use crate::notifier::{ChangeListener, MetricsNotifier};
use crate::registry::MetricRegistry;
use crate::resolver::TagResolver;
use crate::segmented::MetricBuilder;
use crate::tag::TagSet;
use crate::transport::HttpTransport;

/// Immutable identity and tagging configuration of a client.
#[derive(Clone, Debug)]
pub struct ClientInfo {
    tenant: String,
    prefix: Option<String>,
    resolver: TagResolver,
}

impl ClientInfo {
    pub fn new(tenant: String, prefix: Option<String>, resolver: TagResolver) -> Self {
        ClientInfo {
            tenant,
            prefix,
            resolver,
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn resolver(&self) -> &TagResolver {
        &self.resolver
    }

    /// Prepends the configured prefix, if any, to `name`.
    pub fn full_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}

struct Inner {
    info: ClientInfo,
    listener: Arc<dyn ChangeListener>,
    clock: Clock,
    gauges: MetricRegistry<Gauge>,
    counters: MetricRegistry<Counter>,
    watches: MetricRegistry<Watch>,
    availabilities: MetricRegistry<AvailabilityMetric>,
    loggers: MetricRegistry<Logger>,
}

/// Entry point for creating metrics.
///
/// Each `*_with_tags` getter returns the single handle registered under the prefixed name,
/// creating it on first use. On creation, the tags resolved for the name are pushed once to the
/// tagging endpoint if any of them has a value; later calls for the same name ignore their tags.
///
/// Cloning is cheap, clones share the same metric pools.
#[derive(Clone)]
pub struct HawkularClient {
    inner: Arc<Inner>,
}

impl HawkularClient {
    pub(crate) fn new(info: ClientInfo, transport: Arc<dyn HttpTransport>, clock: Clock) -> Self {
        HawkularClient {
            inner: Arc::new(Inner {
                info,
                listener: Arc::new(MetricsNotifier::new(transport)),
                clock,
                gauges: MetricRegistry::new(),
                counters: MetricRegistry::new(),
                watches: MetricRegistry::new(),
                availabilities: MetricRegistry::new(),
                loggers: MetricRegistry::new(),
            }),
        }
    }

    pub fn info(&self) -> &ClientInfo {
        &self.inner.info
    }

    pub fn gauge(&self, name: &str) -> Arc<Gauge> {
        self.gauge_with_tags(name, &TagSet::empty())
    }

    pub fn gauge_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Gauge> {
        self.metric(&self.inner.gauges, name, tags, |full_name, listener| {
            Gauge::new(full_name, listener)
        })
    }

    pub fn counter(&self, name: &str) -> Arc<Counter> {
        self.counter_with_tags(name, &TagSet::empty())
    }

    pub fn counter_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Counter> {
        self.metric(&self.inner.counters, name, tags, |full_name, listener| {
            Counter::new(full_name, listener)
        })
    }

    pub fn watch(&self, name: &str) -> Arc<Watch> {
        self.watch_with_tags(name, &TagSet::empty())
    }

    pub fn watch_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Watch> {
        let clock = self.inner.clock.clone();
        self.metric(&self.inner.watches, name, tags, move |full_name, listener| {
            Watch::new(full_name, listener, clock)
        })
    }

    pub fn availability(&self, name: &str) -> Arc<AvailabilityMetric> {
        self.availability_with_tags(name, &TagSet::empty())
    }

    pub fn availability_with_tags(&self, name: &str, tags: &TagSet) -> Arc<AvailabilityMetric> {
        self.metric(&self.inner.availabilities, name, tags, |full_name, listener| {
            AvailabilityMetric::new(full_name, listener)
        })
    }

    pub fn logger(&self, name: &str) -> Arc<Logger> {
        self.logger_with_tags(name, &TagSet::empty())
    }

    pub fn logger_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Logger> {
        self.metric(&self.inner.loggers, name, tags, |full_name, listener| {
            Logger::new(full_name, listener)
        })
    }

    /// Starts naming a metric from segments, see [`MetricBuilder`].
    pub fn metric_builder(&self) -> MetricBuilder<'_> {
        MetricBuilder::new(self)
    }

    /// Prepares a session running feeders every `frequency`.
    pub fn prepare_monitoring_session(&self, frequency: Duration) -> MonitoringSessionBuilder {
        MonitoringSessionBuilder::new(self.clone(), frequency)
    }

    /// Fully-qualified names of every metric created so far, all kinds together.
    pub fn registered_names(&self) -> Vec<String> {
        let inner = &self.inner;
        let mut names = inner.gauges.names();
        names.extend(inner.counters.names());
        names.extend(inner.watches.names());
        names.extend(inner.availabilities.names());
        names.extend(inner.loggers.names());
        names.sort();
        names.dedup();
        names
    }

    fn metric<T, F>(&self, pool: &MetricRegistry<T>, name: &str, tags: &TagSet, create: F) -> Arc<T>
    where
        T: Metric,
        F: FnOnce(String, Arc<dyn ChangeListener>) -> T,
    {
        let info = &self.inner.info;
        let full_name = info.full_name(name);
        pool.get_or_create(&full_name, || {
            let metric = create(full_name.clone(), self.inner.listener.clone());
            let resolved = info.resolver.resolve(&full_name, tags);
            if resolved.has_present() {
                self.inner
                    .listener
                    .on_tags_updated(metric.descriptor(), &resolved);
            }
            debug!(metric = %full_name, kind = %metric.hawkular_type(), "created metric");
            Arc::new(metric)
        })
    }
}

impl std::fmt::Debug for HawkularClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HawkularClient")
            .field("info", &self.inner.info)
            .finish_non_exhaustive()
    }
}
