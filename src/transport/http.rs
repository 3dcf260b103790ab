use std::panic;
use std::thread;
use std::time::Duration;

use quanta::Clock;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;
use tracing::{debug, warn};

use super::{FailoverCache, HttpTransport, TransportOptions};
use crate::common::{BuildError, HawkularType, TransportError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

enum Request {
    Metrics(String),
    Tags { url: Url, body: String },
}

/// Blocking [`reqwest`] client keeping undelivered requests in a [`FailoverCache`].
///
/// It can be built and used from within a Tokio runtime: on a multi-threaded runtime requests
/// run through [`block_in_place`](tokio::task::block_in_place), on a current-thread runtime
/// they run on a short-lived thread the caller waits for.
pub struct ReqwestTransport {
    client: Client,
    metrics_url: Url,
    base_url: Url,
    failover: FailoverCache<Request>,
}

impl ReqwestTransport {
    /// Creates a transport sending to `options.uri` with `options.headers` on every request.
    ///
    /// # Errors
    ///
    /// Fails if the URI cannot be a base URL, if a header name or value is not valid HTTP, or if
    /// the client cannot be built.
    pub fn new(options: &TransportOptions) -> Result<Self, BuildError> {
        Self::with_clock(options, Clock::new())
    }

    pub(crate) fn with_clock(options: &TransportOptions, clock: Clock) -> Result<Self, BuildError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| BuildError::InvalidHeader(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| BuildError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }

        let base_url = base_url(&options.uri)?;
        let metrics_url = with_segments(&base_url, &["metrics", "raw"]);

        let client = outside_runtime(|| {
            Client::builder()
                .default_headers(headers)
                .timeout(REQUEST_TIMEOUT)
                .build()
        })
        .map_err(|e| BuildError::FailedToCreateHttpClient(e.to_string()))?;

        Ok(ReqwestTransport {
            client,
            metrics_url,
            base_url,
            failover: FailoverCache::new(
                clock,
                options.failover_cache_duration,
                options.failover_cache_max_size,
            ),
        })
    }

    fn tags_url(&self, hawkular_type: HawkularType, metric_name: &str) -> Url {
        with_segments(&self.base_url, &[hawkular_type.as_str(), metric_name, "tags"])
    }

    fn send(&self, request: &Request) -> Result<(), TransportError> {
        let response = match request {
            Request::Metrics(body) => self
                .client
                .post(self.metrics_url.clone())
                .body(body.clone())
                .send()?,
            Request::Tags { url, body } => self.client.put(url.clone()).body(body.clone()).send()?,
        };

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(status.as_u16()))
        }
    }

    fn submit(&self, request: Request) {
        outside_runtime(|| {
            self.failover.retry(|pending| match self.send(pending) {
                Ok(()) => true,
                Err(e) => {
                    debug!(error = %e, "failover retry did not go through");
                    false
                }
            });

            if let Err(e) = self.send(&request) {
                warn!(error = %e, "could not reach hawkular, request kept for later");
                self.failover.push(request);
            }
        });
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_metrics(&self, body: String) {
        self.submit(Request::Metrics(body));
    }

    fn put_tags(&self, hawkular_type: HawkularType, metric_name: &str, body: String) {
        self.submit(Request::Tags {
            url: self.tags_url(hawkular_type, metric_name),
            body,
        });
    }
}

fn base_url(uri: &str) -> Result<Url, BuildError> {
    let url = Url::parse(uri).map_err(|e| BuildError::InvalidUri(format!("{uri}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(BuildError::InvalidUri(format!("{uri}: not a base url")));
    }
    Ok(with_segments(&url, &["hawkular", "metrics"]))
}

/// Appends percent-encoded path segments to `base`.
fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // only fails on cannot-be-a-base urls, rejected by `base_url`
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Runs `f`, which blocks, without stalling or panicking the Tokio runtime it may be called from.
fn outside_runtime<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    match Handle::try_current() {
        Err(_) => f(),
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::MultiThread => task::block_in_place(f),
            _ => thread::scope(|scope| match scope.spawn(f).join() {
                Ok(result) => result,
                Err(payload) => panic::resume_unwind(payload),
            }),
        },
    }
}
