use std::future::Future;
use std::pin::Pin;
use std::thread;
use std::time::Duration;

use metrics_util::registry::Registry;
use metrics_util::{parse_quantiles, Quantile};
use tokio::runtime;
use tracing::error;

use crate::client::HawkularClient;
use crate::common::BuildError;
use crate::recorder::{HawkularRecorder, Inner};

type ExporterFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Builder for creating and installing a Hawkular recorder/exporter.
///
/// Values written through the [`metrics`] macros are stored by the recorder and pushed through
/// the client's metric pools on every interval.
pub struct ReporterBuilder {
    client: HawkularClient,
    quantiles: Vec<Quantile>,
    interval: Duration,
}

impl ReporterBuilder {
    /// Creates a new [`ReporterBuilder`] reporting every minute with the min, median, 0.9, 0.95,
    /// 0.99, 0.999 and max quantiles.
    pub fn new(client: HawkularClient) -> Self {
        ReporterBuilder {
            client,
            quantiles: parse_quantiles(&[0.0, 0.5, 0.9, 0.95, 0.99, 0.999, 1.0]),
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Sets the quantiles reported for every histogram.
    ///
    /// By default, the quantiles will be set to: 0.0, 0.5, 0.9, 0.95, 0.99, 0.999, and 1.0.
    ///
    /// # Errors
    ///
    /// If `quantiles` is empty, an error variant will be thrown.
    pub fn set_quantiles(mut self, quantiles: &[f64]) -> Result<Self, BuildError> {
        if quantiles.is_empty() {
            return Err(BuildError::EmptyQuantiles);
        }

        self.quantiles = parse_quantiles(quantiles);
        Ok(self)
    }

    /// Sets how often the exporter reports.
    ///
    /// # Errors
    ///
    /// If `interval` is zero, an error variant will be thrown.
    pub fn with_interval(mut self, interval: Duration) -> Result<Self, BuildError> {
        if interval.is_zero() {
            return Err(BuildError::InvalidFrequency);
        }

        self.interval = interval;
        Ok(self)
    }

    /// Builds the recorder and exporter and installs them globally.
    ///
    /// When called from within a Tokio runtime, the exporter future is spawned directly
    /// into the runtime.  Otherwise, a new single-threaded Tokio runtime is created
    /// on a background thread, and the exporter is spawned there.
    ///
    /// # Errors
    ///
    /// If there is an error while either building the recorder and exporter, or installing the
    /// recorder and exporter, an error variant will be returned describing the error.
    pub fn install(self) -> Result<(), BuildError> {
        let recorder = if let Ok(handle) = runtime::Handle::try_current() {
            let (recorder, exporter) = {
                let _g = handle.enter();
                self.build()
            };

            handle.spawn(exporter);

            recorder
        } else {
            let runtime = runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| BuildError::FailedToCreateRuntime(e.to_string()))?;

            let (recorder, exporter) = {
                let _g = runtime.enter();
                self.build()
            };

            thread::Builder::new()
                .name("metrics-exporter-hawkular".to_string())
                .spawn(move || runtime.block_on(exporter))
                .map_err(|e| BuildError::FailedToCreateRuntime(e.to_string()))?;

            recorder
        };

        metrics::set_global_recorder(recorder)
            .map_err(|e| BuildError::FailedToSetGlobalRecorder(e.to_string()))?;

        Ok(())
    }

    /// Builds the recorder and exporter and returns them both.
    ///
    /// The exporter must be polled by a Tokio runtime. Reports run on Tokio's blocking pool
    /// since the transport blocks.
    pub fn build(self) -> (HawkularRecorder, ExporterFuture) {
        let interval = self.interval;
        let recorder = self.build_recorder();
        let handle = recorder.handle();

        let exporter = async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let handle = handle.clone();
                if let Err(e) = tokio::task::spawn_blocking(move || handle.report()).await {
                    error!("error reporting metrics to hawkular: {:?}", e);
                }
            }
        };

        (recorder, Box::pin(exporter))
    }

    /// Builds the recorder and returns it. Reporting is left to [`HawkularHandle::report`].
    ///
    /// [`HawkularHandle::report`]: crate::HawkularHandle::report
    pub fn build_recorder(self) -> HawkularRecorder {
        HawkularRecorder::from(Inner {
            registry: Registry::atomic(),
            quantiles: self.quantiles,
            client: self.client,
        })
    }
}
