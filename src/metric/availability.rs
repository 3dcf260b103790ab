use std::sync::Arc;

use super::{impl_metric, Availability, Emitter, Value};
use crate::common::HawkularType;
use crate::notifier::ChangeListener;
use crate::tag::TagSet;

pub struct AvailabilityMetric {
    emitter: Emitter,
}

impl AvailabilityMetric {
    pub fn new(name: String, listener: Arc<dyn ChangeListener>) -> Self {
        AvailabilityMetric {
            emitter: Emitter::new(HawkularType::Availability, name, listener),
        }
    }

    pub fn set(&self, availability: Availability) {
        self.set_with_tags(availability, &TagSet::empty());
    }

    pub fn set_with_tags(&self, availability: Availability, tags: &TagSet) {
        self.emitter.emit(Value::Availability(availability), tags);
    }

    pub fn up(&self) {
        self.set(Availability::Up);
    }

    pub fn up_with_tags(&self, tags: &TagSet) {
        self.set_with_tags(Availability::Up, tags);
    }

    pub fn down(&self) {
        self.set(Availability::Down);
    }

    pub fn down_with_tags(&self, tags: &TagSet) {
        self.set_with_tags(Availability::Down, tags);
    }

    pub fn unknown(&self) {
        self.set(Availability::Unknown);
    }

    pub fn unknown_with_tags(&self, tags: &TagSet) {
        self.set_with_tags(Availability::Unknown, tags);
    }

    pub fn admin(&self) {
        self.set(Availability::Admin);
    }

    pub fn admin_with_tags(&self, tags: &TagSet) {
        self.set_with_tags(Availability::Admin, tags);
    }
}

impl_metric!(AvailabilityMetric);
