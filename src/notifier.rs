use std::sync::Arc;

use crate::common::MetricDescriptor;
use crate::formatting;
use crate::metric::DataPoint;
use crate::tag::TagSet;
use crate::transport::HttpTransport;

/// Receives value changes and tag updates from metric handles.
///
/// Both calls are fire-and-forget: implementations must not report failures back to the
/// emitting code.
pub trait ChangeListener: Send + Sync {
    fn on_value_changed(&self, metric: &MetricDescriptor, data_point: &DataPoint);

    fn on_tags_updated(&self, metric: &MetricDescriptor, tags: &TagSet);
}

/// Serializes changes and hands them to the HTTP transport.
pub struct MetricsNotifier {
    transport: Arc<dyn HttpTransport>,
}

impl MetricsNotifier {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        MetricsNotifier { transport }
    }
}

impl ChangeListener for MetricsNotifier {
    fn on_value_changed(&self, metric: &MetricDescriptor, data_point: &DataPoint) {
        self.transport
            .post_metrics(formatting::metric_to_json(metric, data_point));
    }

    fn on_tags_updated(&self, metric: &MetricDescriptor, tags: &TagSet) {
        self.transport.put_tags(
            metric.hawkular_type(),
            metric.name(),
            formatting::tags_to_json(tags),
        );
    }
}
