use std::sync::Arc;

use super::{impl_metric, Emitter, Value};
use crate::common::HawkularType;
use crate::notifier::ChangeListener;
use crate::tag::TagSet;

/// A double value sampled at arbitrary times.
pub struct Gauge {
    emitter: Emitter,
}

impl Gauge {
    pub fn new(name: String, listener: Arc<dyn ChangeListener>) -> Self {
        Gauge {
            emitter: Emitter::new(HawkularType::Gauges, name, listener),
        }
    }

    pub fn set(&self, value: f64) {
        self.set_with_tags(value, &TagSet::empty());
    }

    pub fn set_with_tags(&self, value: f64, tags: &TagSet) {
        self.emitter.emit(Value::Double(value), tags);
    }
}

impl_metric!(Gauge);
