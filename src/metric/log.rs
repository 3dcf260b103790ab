use std::sync::Arc;

use super::{impl_metric, Emitter, Value};
use crate::common::HawkularType;
use crate::notifier::ChangeListener;
use crate::tag::TagSet;

/// A timeline of string events.
pub struct Logger {
    emitter: Emitter,
}

impl Logger {
    pub fn new(name: String, listener: Arc<dyn ChangeListener>) -> Self {
        Logger {
            emitter: Emitter::new(HawkularType::Strings, name, listener),
        }
    }

    pub fn log(&self, message: &str) {
        self.log_with_tags(message, &TagSet::empty());
    }

    pub fn log_with_tags(&self, message: &str, tags: &TagSet) {
        self.emitter.emit(Value::String(message.to_string()), tags);
    }
}

impl_metric!(Logger);
