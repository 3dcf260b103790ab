use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use sysinfo::{Pid, System};
use tracing::warn;

use super::{Feeder, FeederSet};
use crate::client::HawkularClient;
use crate::metric::Gauge;
use crate::tag::{Tag, TagSet};

const MAX_CPU_PERCENT: f64 = 99.0;

/// Reports the CPU usage of the current process, in percent, to the gauge `monitor.cpu.core`.
///
/// Usage is measured between two consecutive runs, so the first run only takes a reference
/// sample.
#[derive(Clone, Debug, Default)]
pub struct CpuMonitoring {
    divide_by_nb_cores: bool,
    tags: TagSet,
}

impl CpuMonitoring {
    pub fn create() -> Self {
        CpuMonitoring::default()
    }

    pub fn builder() -> CpuMonitoringBuilder {
        CpuMonitoringBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct CpuMonitoringBuilder {
    inner: CpuMonitoring,
}

impl CpuMonitoringBuilder {
    /// Reports usage relative to all cores rather than to one.
    #[must_use]
    pub fn divide_by_nb_cores(mut self) -> Self {
        self.inner.divide_by_nb_cores = true;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &TagSet) -> Self {
        self.inner.tags.add_all(tags);
        self
    }

    #[must_use]
    pub fn with_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.tags.add(Tag::new(key, value));
        self
    }

    pub fn build(self) -> CpuMonitoring {
        self.inner
    }
}

impl FeederSet for CpuMonitoring {
    fn feeders(&self, client: &HawkularClient) -> Vec<Arc<dyn Feeder>> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                warn!("cpu monitoring unavailable: {e}");
                return Vec::new();
            }
        };

        let feeder: Arc<dyn Feeder> = Arc::new(CpuFeeder {
            gauge: client.gauge_with_tags("monitor.cpu.core", &self.tags),
            divide_by_nb_cores: self.divide_by_nb_cores,
            pid,
            sampler: Mutex::new(Sampler {
                system: System::new(),
                primed: false,
            }),
        });
        vec![feeder]
    }
}

struct Sampler {
    system: System,
    primed: bool,
}

struct CpuFeeder {
    gauge: Arc<Gauge>,
    divide_by_nb_cores: bool,
    pid: Pid,
    sampler: Mutex<Sampler>,
}

impl Feeder for CpuFeeder {
    fn feed(&self) {
        let usage = {
            let mut sampler = self.sampler.lock().unwrap_or_else(PoisonError::into_inner);
            if !sampler.system.refresh_process(self.pid) {
                return;
            }
            let usage = sampler.system.process(self.pid).map(|p| p.cpu_usage());
            if !sampler.primed {
                sampler.primed = true;
                return;
            }
            usage
        };

        if let Some(usage) = usage {
            let cores = if self.divide_by_nb_cores {
                thread::available_parallelism().map_or(1, |n| n.get())
            } else {
                1
            };
            self.gauge.set(cpu_percent(usage, cores));
        }
    }
}

/// `raw` is the usage summed over cores, so it may exceed 100 on multi-core machines.
fn cpu_percent(raw: f32, cores: usize) -> f64 {
    let cores = cores.max(1) as f64;
    (f64::from(raw) / cores).min(MAX_CPU_PERCENT)
}
