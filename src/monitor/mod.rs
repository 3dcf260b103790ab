//! Periodic sampling of values into metrics.
//!
//! A [`MonitoringSession`] runs every registered [`Feeder`] at a fixed rate, each on its own
//! schedule, starting immediately. Feeders run on a dedicated pool of threads and a single feeder
//! never overlaps with itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{self, Runtime};
use tracing::error;

use crate::client::HawkularClient;
use crate::common::BuildError;

mod cpu;
mod memory;

pub use cpu::{CpuMonitoring, CpuMonitoringBuilder};
pub use memory::{MemoryMonitoring, MemoryMonitoringBuilder};

const DEFAULT_THREAD_POOL_SIZE: usize = 5;

/// A task sampling one or more values, typically into gauges.
pub trait Feeder: Send + Sync + 'static {
    fn feed(&self);
}

impl<F> Feeder for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn feed(&self) {
        self()
    }
}

/// A group of feeders sharing the client they report to.
pub trait FeederSet {
    fn feeders(&self, client: &HawkularClient) -> Vec<Arc<dyn Feeder>>;
}

/// Builder for a [`MonitoringSession`], see
/// [`HawkularClient::prepare_monitoring_session`].
pub struct MonitoringSessionBuilder {
    client: HawkularClient,
    frequency: Duration,
    thread_pool_size: usize,
    feeders: Vec<Arc<dyn Feeder>>,
}

impl MonitoringSessionBuilder {
    pub(crate) fn new(client: HawkularClient, frequency: Duration) -> Self {
        MonitoringSessionBuilder {
            client,
            frequency,
            thread_pool_size: DEFAULT_THREAD_POOL_SIZE,
            feeders: Vec::new(),
        }
    }

    #[must_use]
    pub fn feed<F: Feeder>(mut self, feeder: F) -> Self {
        self.feeders.push(Arc::new(feeder));
        self
    }

    #[must_use]
    pub fn feeds<S: FeederSet>(mut self, feeder_set: S) -> Self {
        self.feeders.extend(feeder_set.feeders(&self.client));
        self
    }

    /// Number of threads running the feeders. Defaults to 5.
    #[must_use]
    pub fn thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = size.max(1);
        self
    }

    /// Starts running every feeder.
    ///
    /// # Errors
    ///
    /// If the frequency is zero, or the threads cannot be spawned, an error variant will be
    /// returned describing the error.
    pub fn start(self) -> Result<MonitoringSession, BuildError> {
        if self.frequency.is_zero() {
            return Err(BuildError::InvalidFrequency);
        }

        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(self.thread_pool_size)
            .max_blocking_threads(self.thread_pool_size)
            .thread_name("hawkular-monitoring")
            .enable_time()
            .build()
            .map_err(|e| BuildError::FailedToCreateRuntime(e.to_string()))?;

        let frequency = self.frequency;
        for feeder in self.feeders {
            runtime.spawn(async move {
                let mut interval = tokio::time::interval(frequency);
                loop {
                    interval.tick().await;
                    let feeder = feeder.clone();
                    // feeders usually emit, and emitting may block on HTTP
                    if let Err(e) = tokio::task::spawn_blocking(move || feeder.feed()).await {
                        if e.is_panic() {
                            error!("monitoring feeder panicked: {e}");
                        } else {
                            break;
                        }
                    }
                }
            });
        }

        Ok(MonitoringSession {
            runtime: Some(runtime),
        })
    }
}

/// Running feeders. Dropping the session stops it.
pub struct MonitoringSession {
    runtime: Option<Runtime>,
}

impl MonitoringSession {
    /// Stops scheduling feeders. Runs already in progress are not waited for.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
