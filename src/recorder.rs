use std::sync::atomic::Ordering;
use std::sync::Arc;

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use metrics_util::registry::{AtomicStorage, Registry};
use metrics_util::{Quantile, Summary};

use crate::client::HawkularClient;
use crate::tag::{Tag, TagSet};

pub(crate) struct Inner {
    pub registry: Registry<Key, AtomicStorage>,
    pub quantiles: Vec<Quantile>,
    pub client: HawkularClient,
}

impl Inner {
    fn report(&self) {
        let untagged = TagSet::empty();

        for (key, counter) in self.registry.get_counter_handles() {
            let series = Series::from(&key);
            let value = counter.load(Ordering::Acquire);
            self.client
                .counter_with_tags(&series.id(""), &series.tags)
                .publish(value, &untagged);
        }

        for (key, gauge) in self.registry.get_gauge_handles() {
            let series = Series::from(&key);
            let value = f64::from_bits(gauge.load(Ordering::Acquire));
            self.client
                .gauge_with_tags(&series.id(""), &series.tags)
                .set_with_tags(value, &untagged);
        }

        for (key, histogram) in self.registry.get_histogram_handles() {
            let mut summary = Summary::with_defaults();
            let mut sum = 0.0;
            histogram.clear_with(|samples| {
                for sample in samples {
                    summary.add(*sample);
                    sum += *sample;
                }
            });

            let count = summary.count();
            // nothing recorded since the last report
            if count == 0 {
                continue;
            }

            let series = Series::from(&key);
            let report = |suffix: &str, value: f64| {
                self.client
                    .gauge_with_tags(&series.id(&format!(".{suffix}")), &series.tags)
                    .set_with_tags(value, &untagged);
            };
            for quantile in &self.quantiles {
                let value = summary.quantile(quantile.value()).unwrap_or(0.0);
                report(&quantile_suffix(quantile), value);
            }
            report("avg", sum / count as f64);
            report("sum", sum);
            report("count", count as f64);
        }
    }
}

/// One labelled series of a `metrics` key, reported as its own Hawkular metric.
///
/// Labels are sorted by key into the id, e.g. `requests{method=get,status=200}`, and become the
/// tags of the metric.
struct Series {
    name: String,
    labels: String,
    tags: TagSet,
}

impl Series {
    fn id(&self, suffix: &str) -> String {
        format!("{}{suffix}{}", self.name, self.labels)
    }
}

impl From<&Key> for Series {
    fn from(key: &Key) -> Self {
        let mut labels: Vec<_> = key.labels().map(|l| (l.key(), l.value())).collect();
        labels.sort_unstable();

        let labels_id = if labels.is_empty() {
            String::new()
        } else {
            let joined: Vec<_> = labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{{{}}}", joined.join(","))
        };

        Series {
            name: key.name().to_string(),
            labels: labels_id,
            tags: labels.into_iter().map(|(k, v)| Tag::new(k, v)).collect(),
        }
    }
}

fn quantile_suffix(quantile: &Quantile) -> String {
    let value = quantile.value();
    if value == 0.0 {
        "min".to_string()
    } else if value == 0.5 {
        "median".to_string()
    } else if value == 1.0 {
        "max".to_string()
    } else {
        value.to_string()
    }
}

/// A [`Recorder`] keeping `metrics` values until they are reported to Hawkular.
///
/// Counters are reported with their cumulative count, gauges with their last value. Histograms
/// are summarized over the samples recorded since the previous report. Every label set is its
/// own Hawkular metric, named after the key and its sorted labels and tagged with the labels.
pub struct HawkularRecorder {
    inner: Arc<Inner>,
}

impl HawkularRecorder {
    pub fn handle(&self) -> HawkularHandle {
        HawkularHandle {
            inner: self.inner.clone(),
        }
    }
}

impl From<Inner> for HawkularRecorder {
    fn from(inner: Inner) -> Self {
        HawkularRecorder {
            inner: Arc::new(inner),
        }
    }
}

impl Recorder for HawkularRecorder {
    fn describe_counter(&self, _k: KeyName, _u: Option<Unit>, _d: SharedString) {}
    fn describe_gauge(&self, _k: KeyName, _u: Option<Unit>, _d: SharedString) {}
    fn describe_histogram(&self, _k: KeyName, _u: Option<Unit>, _d: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        self.inner
            .registry
            .get_or_create_counter(key, |c| c.clone().into())
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        self.inner
            .registry
            .get_or_create_gauge(key, |c| c.clone().into())
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        self.inner
            .registry
            .get_or_create_histogram(key, |c| c.clone().into())
    }
}

/// Handle for pushing the metrics stored by a [`HawkularRecorder`].
///
/// The exporter built by [`ReporterBuilder`](crate::ReporterBuilder) calls [`report`] on a
/// fixed interval. It can also be called directly, e.g. before the application exits.
///
/// [`report`]: HawkularHandle::report
#[derive(Clone)]
pub struct HawkularHandle {
    inner: Arc<Inner>,
}

impl HawkularHandle {
    /// Sends one data point per stored metric. Blocks while the transport sends.
    pub fn report(&self) {
        self.inner.report();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metrics::{Key, Label, Level, Metadata, Recorder};
    use metrics_util::parse_quantiles;
    use metrics_util::registry::Registry;
    use serde_json::Value as JsonValue;

    use super::{quantile_suffix, HawkularRecorder, Inner};
    use crate::builder::HawkularClientBuilder;
    use crate::transport::mock::{MockTransport, TagsData};
    use crate::transport::HttpTransport;

    static METADATA: Metadata = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

    fn recorder(quantiles: &[f64]) -> (HawkularRecorder, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::default());
        let provided = transport.clone();
        let client = HawkularClientBuilder::new("t")
            .use_http_client(move |_| provided as Arc<dyn HttpTransport>)
            .build()
            .unwrap();
        let recorder = HawkularRecorder::from(Inner {
            registry: Registry::atomic(),
            quantiles: parse_quantiles(quantiles),
            client,
        });
        (recorder, transport)
    }

    // (type, id, value, tags) of every body sent
    fn points(transport: &MockTransport) -> Vec<(String, String, JsonValue, Option<JsonValue>)> {
        transport
            .metrics_sent()
            .iter()
            .map(|body| {
                let json: JsonValue = serde_json::from_str(body).unwrap();
                let (kind, metrics) = json.as_object().unwrap().iter().next().unwrap();
                let metric = &metrics[0];
                let point = &metric["dataPoints"][0];
                (
                    kind.clone(),
                    metric["id"].as_str().unwrap().to_string(),
                    point["value"].clone(),
                    point.get("tags").cloned(),
                )
            })
            .collect()
    }

    #[test]
    fn test_counter_reports_cumulative_count() {
        let (recorder, transport) = recorder(&[0.5]);
        let key = Key::from_parts("requests", vec![Label::new("method", "get")]);
        let counter = recorder.register_counter(&key, &METADATA);
        let handle = recorder.handle();

        counter.increment(3);
        handle.report();
        counter.increment(2);
        handle.report();

        let points = points(&transport);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].0, "counters");
        assert_eq!(points[0].1, "requests{method=get}");
        assert_eq!(points[0].2, JsonValue::from(3));
        assert_eq!(points[0].3, None);
        assert_eq!(points[1].2, JsonValue::from(5));
    }

    #[test]
    fn test_label_sets_are_separate_metrics() {
        let (recorder, transport) = recorder(&[0.5]);
        let get = recorder.register_counter(
            &Key::from_parts("requests", vec![Label::new("method", "get")]),
            &METADATA,
        );
        let post = recorder.register_counter(
            &Key::from_parts(
                "requests",
                vec![Label::new("status", "200"), Label::new("method", "post")],
            ),
            &METADATA,
        );
        get.increment(100);
        post.increment(3);
        recorder.handle().report();

        let mut points: Vec<_> = points(&transport)
            .into_iter()
            .map(|(_, id, value, _)| (id, value))
            .collect();
        points.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            points,
            [
                ("requests{method=get}".to_string(), JsonValue::from(100)),
                ("requests{method=post,status=200}".to_string(), JsonValue::from(3)),
            ]
        );

        let client = &recorder.inner.client;
        assert_eq!(client.counter("requests{method=get}").count(), 100);
        assert_eq!(client.counter("requests{method=post,status=200}").count(), 3);
        assert_eq!(
            client.registered_names(),
            ["requests{method=get}", "requests{method=post,status=200}"]
        );

        let mut tags = transport.tags_sent();
        tags.sort_by(|a, b| a.resource.cmp(&b.resource));
        assert_eq!(
            tags,
            [
                TagsData {
                    resource: "/counters/requests{method=get}/tags".to_string(),
                    body: r#"{"method":"get"}"#.to_string(),
                },
                TagsData {
                    resource: "/counters/requests{method=post,status=200}/tags".to_string(),
                    body: r#"{"method":"post","status":"200"}"#.to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_gauge_reports_last_value() {
        let (recorder, transport) = recorder(&[0.5]);
        let gauge = recorder.register_gauge(&Key::from_name("temperature"), &METADATA);
        gauge.set(21.5);
        gauge.increment(1.0);
        recorder.handle().report();

        let points = points(&transport);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].0, "gauges");
        assert_eq!(points[0].2, JsonValue::from(22.5));
        assert_eq!(points[0].3, None);
    }

    #[test]
    fn test_histogram_summary() {
        let (recorder, transport) = recorder(&[0.0, 0.5, 1.0]);
        let histogram = recorder.register_histogram(&Key::from_name("latency"), &METADATA);
        histogram.record(1.0);
        histogram.record(2.0);
        histogram.record(3.0);

        let handle = recorder.handle();
        handle.report();

        let points = points(&transport);
        let ids: Vec<_> = points.iter().map(|p| p.1.as_str()).collect();
        assert_eq!(
            ids,
            [
                "latency.min",
                "latency.median",
                "latency.max",
                "latency.avg",
                "latency.sum",
                "latency.count"
            ]
        );
        assert_eq!(points[3].2, JsonValue::from(2.0));
        assert_eq!(points[4].2, JsonValue::from(6.0));
        assert_eq!(points[5].2, JsonValue::from(3.0));

        // samples are drained by each report
        transport.clear();
        handle.report();
        assert!(transport.metrics_sent().is_empty());
    }

    #[test]
    fn test_quantile_suffix() {
        let suffixes: Vec<_> = parse_quantiles(&[0.0, 0.5, 0.99, 1.0])
            .iter()
            .map(quantile_suffix)
            .collect();
        assert_eq!(suffixes, ["min", "median", "0.99", "max"]);
    }
}
