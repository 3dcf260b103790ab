use std::sync::{Arc, Mutex, PoisonError};

use quanta::{Clock, Instant};

use super::{impl_metric, Emitter, Value};
use crate::common::HawkularType;
use crate::notifier::ChangeListener;
use crate::tag::TagSet;

/// A stopwatch, reported as a gauge of the milliseconds elapsed since the last reset or tick.
pub struct Watch {
    emitter: Emitter,
    clock: Clock,
    started: Mutex<Instant>,
}

impl Watch {
    pub fn new(name: String, listener: Arc<dyn ChangeListener>, clock: Clock) -> Self {
        let started = Mutex::new(clock.now());
        Watch {
            emitter: Emitter::new(HawkularType::Gauges, name, listener),
            clock,
            started,
        }
    }

    pub fn reset(&self) {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        *started = self.clock.now();
    }

    pub fn tick(&self) {
        self.tick_with_tags(&TagSet::empty());
    }

    pub fn tick_with_tags(&self, tags: &TagSet) {
        let elapsed = {
            let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
            let now = self.clock.now();
            let elapsed = now.duration_since(*started);
            *started = now;
            elapsed
        };
        self.emitter
            .emit(Value::Double(elapsed.as_nanos() as f64 / 1_000_000.0), tags);
    }
}

impl_metric!(Watch);
