//! Metric handles handed out by [`HawkularClient`](crate::HawkularClient).
//!
//! Every handle is bound to a fully-qualified name and to the client's change listener. Values
//! are pushed as soon as they are emitted; nothing is aggregated locally.

use std::sync::Arc;

use crate::common::{HawkularType, MetricDescriptor};
use crate::notifier::ChangeListener;
use crate::tag::TagSet;

mod availability;
mod counter;
mod data_point;
mod gauge;
mod log;
mod watch;

pub use availability::AvailabilityMetric;
pub use counter::Counter;
pub use data_point::{Availability, DataPoint, Value};
pub use gauge::Gauge;
pub use log::Logger;
pub use watch::Watch;

/// Common accessors of every metric handle.
pub trait Metric {
    fn descriptor(&self) -> &MetricDescriptor;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn hawkular_type(&self) -> HawkularType {
        self.descriptor().hawkular_type()
    }
}

/// Shared plumbing of metric handles: identity plus the listener values go to.
struct Emitter {
    descriptor: MetricDescriptor,
    listener: Arc<dyn ChangeListener>,
}

impl Emitter {
    fn new(hawkular_type: HawkularType, name: String, listener: Arc<dyn ChangeListener>) -> Self {
        Emitter {
            descriptor: MetricDescriptor::new(hawkular_type, name),
            listener,
        }
    }

    fn emit(&self, value: Value, tags: &TagSet) {
        let data_point = DataPoint::now(value, tags.clone());
        self.listener
            .on_value_changed(&self.descriptor, &data_point);
    }
}

macro_rules! impl_metric {
    ($t:ty) => {
        impl $crate::metric::Metric for $t {
            fn descriptor(&self) -> &$crate::common::MetricDescriptor {
                &self.emitter.descriptor
            }
        }

        impl std::fmt::Debug for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($t))
                    .field("descriptor", &self.emitter.descriptor)
                    .finish()
            }
        }
    };
}
use impl_metric;
