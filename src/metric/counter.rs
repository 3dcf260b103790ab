use std::sync::Arc;

use portable_atomic::{AtomicU64, Ordering};

use super::{impl_metric, Emitter, Value};
use crate::common::HawkularType;
use crate::notifier::ChangeListener;
use crate::tag::TagSet;

/// A monotonic count. Every increment posts the running total.
pub struct Counter {
    emitter: Emitter,
    count: AtomicU64,
}

impl Counter {
    pub fn new(name: String, listener: Arc<dyn ChangeListener>) -> Self {
        Counter {
            emitter: Emitter::new(HawkularType::Counters, name, listener),
            count: AtomicU64::new(0),
        }
    }

    pub fn inc(&self) {
        self.inc_with_tags(&TagSet::empty());
    }

    pub fn inc_with_tags(&self, tags: &TagSet) {
        let count = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        self.emitter.emit(Value::Count(count), tags);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Posts a total maintained elsewhere, e.g. by a `metrics` counter.
    pub(crate) fn publish(&self, count: u64, tags: &TagSet) {
        self.count.store(count, Ordering::Release);
        self.emitter.emit(Value::Count(count), tags);
    }
}

impl_metric!(Counter);
