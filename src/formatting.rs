use serde_json::{json, Map, Value as JsonValue};

use crate::common::MetricDescriptor;
use crate::metric::{DataPoint, Value};
use crate::tag::TagSet;

// {"<type>":[{"id":"<name>","dataPoints":[{"timestamp":<ms>,"value":<v>,"tags":{..}}]}]}
pub fn metric_to_json(metric: &MetricDescriptor, data_point: &DataPoint) -> String {
    let mut body = Map::new();
    body.insert(
        metric.hawkular_type().as_str().to_string(),
        json!([{
            "id": metric.name(),
            "dataPoints": [data_point_json(data_point)],
        }]),
    );
    JsonValue::Object(body).to_string()
}

/// Renders the body of a tagging call: every tag that has a value, in insertion order.
pub fn tags_to_json(tags: &TagSet) -> String {
    JsonValue::Object(present_tags(tags)).to_string()
}

fn data_point_json(data_point: &DataPoint) -> JsonValue {
    let mut point = Map::new();
    point.insert("timestamp".to_string(), json!(data_point.timestamp()));
    point.insert("value".to_string(), value_json(data_point.value()));
    // an empty tag object is never sent
    if data_point.tags().has_present() {
        point.insert(
            "tags".to_string(),
            JsonValue::Object(present_tags(data_point.tags())),
        );
    }
    JsonValue::Object(point)
}

fn value_json(value: &Value) -> JsonValue {
    match value {
        // non-finite doubles become null
        Value::Double(v) => json!(v),
        Value::Count(v) => json!(v),
        Value::Availability(a) => json!(a.as_str()),
        Value::String(s) => json!(s),
    }
}

fn present_tags(tags: &TagSet) -> Map<String, JsonValue> {
    tags.iter_present()
        .map(|(k, v)| (k.to_string(), JsonValue::String(v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{metric_to_json, tags_to_json};
    use crate::common::{HawkularType, MetricDescriptor};
    use crate::metric::{Availability, DataPoint, Value};
    use crate::tag::{Tag, TagSet};

    #[test]
    fn test_render_gauge_without_tags() {
        let metric = MetricDescriptor::new(HawkularType::Gauges, "2001.hal.heat");
        let point = DataPoint::new(1000, Value::Double(5.5), TagSet::empty());

        assert_eq!(
            metric_to_json(&metric, &point),
            r#"{"gauges":[{"id":"2001.hal.heat","dataPoints":[{"timestamp":1000,"value":5.5}]}]}"#
        );
    }

    #[test]
    fn test_render_point_tags() {
        let metric = MetricDescriptor::new(HawkularType::Counters, "2001.hal.quotes");
        let point = DataPoint::new(1000, Value::Count(2), TagSet::singleton("t1", "v1"));

        assert_eq!(
            metric_to_json(&metric, &point),
            r#"{"counters":[{"id":"2001.hal.quotes","dataPoints":[{"timestamp":1000,"value":2,"tags":{"t1":"v1"}}]}]}"#
        );
    }

    #[test]
    fn test_bare_point_tags_are_omitted() {
        let metric = MetricDescriptor::new(HawkularType::Availability, "2001.hal.health");
        let point = DataPoint::new(
            7,
            Value::Availability(Availability::Admin),
            TagSet::from_iter([Tag::bare("pending")]),
        );

        assert_eq!(
            metric_to_json(&metric, &point),
            r#"{"availability":[{"id":"2001.hal.health","dataPoints":[{"timestamp":7,"value":"ADMIN"}]}]}"#
        );
    }

    #[test]
    fn test_render_tags_in_order() {
        let tags = TagSet::from_iter([
            Tag::new("source", "2001.hal"),
            Tag::bare("ignored"),
            Tag::new("severity", "error"),
        ]);
        assert_eq!(
            tags_to_json(&tags),
            r#"{"source":"2001.hal","severity":"error"}"#
        );
        assert_eq!(tags_to_json(&TagSet::empty()), "{}");
    }

    #[test]
    fn test_render_string_value_is_escaped() {
        let metric = MetricDescriptor::new(HawkularType::Strings, "log");
        let point = DataPoint::new(1, Value::String("say \"hi\"".to_string()), TagSet::empty());

        assert_eq!(
            metric_to_json(&metric, &point),
            r#"{"strings":[{"id":"log","dataPoints":[{"timestamp":1,"value":"say \"hi\""}]}]}"#
        );
    }
}
