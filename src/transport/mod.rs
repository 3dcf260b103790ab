//! Delivery of metric bodies and tag updates to the Hawkular server.

use std::time::Duration;

use indexmap::IndexMap;

use crate::common::HawkularType;

mod failover;
pub(crate) use failover::FailoverCache;

mod http;
pub use http::ReqwestTransport;

#[cfg(test)]
pub(crate) mod mock;

/// Sends serialized bodies to Hawkular.
///
/// Calls may block the caller but never fail from its point of view: errors stay inside the
/// transport, which is expected to keep undelivered requests in its failover cache.
pub trait HttpTransport: Send + Sync {
    /// Posts data points, see [`metric_to_json`](crate::formatting::metric_to_json).
    fn post_metrics(&self, body: String);

    /// Replaces the tags of one metric, see [`tags_to_json`](crate::formatting::tags_to_json).
    fn put_tags(&self, hawkular_type: HawkularType, metric_name: &str, body: String);
}

/// Everything a transport needs to know about the server and the failover policy.
#[derive(Clone, Debug)]
pub struct TransportOptions {
    pub uri: String,
    pub headers: IndexMap<String, String>,
    /// Undelivered requests older than this are dropped. `None` keeps them forever.
    pub failover_cache_duration: Option<Duration>,
    /// At most this many undelivered requests are kept, oldest dropped first.
    pub failover_cache_max_size: Option<usize>,
}
