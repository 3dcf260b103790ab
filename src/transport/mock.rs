//! In-memory stand-ins for the transport and the change listener.

use std::sync::Mutex;

use super::HttpTransport;
use crate::common::{HawkularType, MetricDescriptor};
use crate::metric::DataPoint;
use crate::notifier::ChangeListener;
use crate::tag::TagSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TagsData {
    pub(crate) resource: String,
    pub(crate) body: String,
}

/// Records every body instead of sending it.
#[derive(Default)]
pub(crate) struct MockTransport {
    metrics: Mutex<Vec<String>>,
    tags: Mutex<Vec<TagsData>>,
}

impl MockTransport {
    pub(crate) fn metrics_sent(&self) -> Vec<String> {
        self.metrics.lock().unwrap().clone()
    }

    pub(crate) fn tags_sent(&self) -> Vec<TagsData> {
        self.tags.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.metrics.lock().unwrap().clear();
        self.tags.lock().unwrap().clear();
    }
}

impl HttpTransport for MockTransport {
    fn post_metrics(&self, body: String) {
        self.metrics.lock().unwrap().push(body);
    }

    fn put_tags(&self, hawkular_type: HawkularType, metric_name: &str, body: String) {
        self.tags.lock().unwrap().push(TagsData {
            resource: format!("/{hawkular_type}/{metric_name}/tags"),
            body,
        });
    }
}

/// Records structured changes, before any serialization.
#[derive(Default)]
pub(crate) struct RecordingListener {
    points: Mutex<Vec<(MetricDescriptor, DataPoint)>>,
    tag_updates: Mutex<Vec<(MetricDescriptor, TagSet)>>,
}

impl RecordingListener {
    pub(crate) fn points(&self) -> Vec<(MetricDescriptor, DataPoint)> {
        self.points.lock().unwrap().clone()
    }

    pub(crate) fn tag_updates(&self) -> Vec<(MetricDescriptor, TagSet)> {
        self.tag_updates.lock().unwrap().clone()
    }
}

impl ChangeListener for RecordingListener {
    fn on_value_changed(&self, metric: &MetricDescriptor, data_point: &DataPoint) {
        self.points
            .lock()
            .unwrap()
            .push((metric.clone(), data_point.clone()));
    }

    fn on_tags_updated(&self, metric: &MetricDescriptor, tags: &TagSet) {
        self.tag_updates
            .lock()
            .unwrap()
            .push((metric.clone(), tags.clone()));
    }
}
