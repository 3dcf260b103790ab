use std::sync::{Arc, Mutex, PoisonError};

use sysinfo::{Pid, System};

use super::{Feeder, FeederSet};
use crate::client::HawkularClient;
use crate::tag::{Tag, TagSet};

/// Reports, in bytes, free system memory, free swap and the resident memory of the current
/// process.
#[derive(Clone, Debug, Default)]
pub struct MemoryMonitoring {
    tags: TagSet,
}

impl MemoryMonitoring {
    pub fn create() -> Self {
        MemoryMonitoring::default()
    }

    pub fn builder() -> MemoryMonitoringBuilder {
        MemoryMonitoringBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct MemoryMonitoringBuilder {
    inner: MemoryMonitoring,
}

impl MemoryMonitoringBuilder {
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

    pub fn build(self) -> MemoryMonitoring {
        self.inner
    }
}

impl FeederSet for MemoryMonitoring {
    fn feeders(&self, client: &HawkularClient) -> Vec<Arc<dyn Feeder>> {
        let system = Arc::new(Mutex::new(System::new()));
        let mut feeders: Vec<Arc<dyn Feeder>> = Vec::with_capacity(3);

        let free = client.gauge_with_tags("monitor.memory.system.free", &self.tags);
        let sys = system.clone();
        feeders.push(Arc::new(move || {
            let mut sys = sys.lock().unwrap_or_else(PoisonError::into_inner);
            sys.refresh_memory();
            free.set(sys.free_memory() as f64);
        }));

        let swap_free = client.gauge_with_tags("monitor.memory.system.swap.free", &self.tags);
        let sys = system.clone();
        feeders.push(Arc::new(move || {
            let mut sys = sys.lock().unwrap_or_else(PoisonError::into_inner);
            sys.refresh_memory();
            swap_free.set(sys.free_swap() as f64);
        }));

        if let Ok(pid) = sysinfo::get_current_pid() {
            let heap = client.gauge_with_tags("monitor.memory.process.heap", &self.tags);
            feeders.push(Arc::new(move || {
                if let Some(used) = process_memory(&system, pid) {
                    heap.set(used as f64);
                }
            }));
        }

        feeders
    }
}

fn process_memory(system: &Mutex<System>, pid: Pid) -> Option<u64> {
    let mut sys = system.lock().unwrap_or_else(PoisonError::into_inner);
    if !sys.refresh_process(pid) {
        return None;
    }
    sys.process(pid).map(|p| p.memory())
}
