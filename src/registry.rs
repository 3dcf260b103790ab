use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

type Slot<T> = Arc<OnceLock<Arc<T>>>;

/// A name-keyed pool holding exactly one handle per fully-qualified metric name.
///
/// Entries are never removed. The map lock is only held to find or insert a slot; the handle
/// itself is built inside the slot, so concurrent creators of one name wait for the first one
/// while creators of other names proceed.
pub(crate) struct MetricRegistry<T> {
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> MetricRegistry<T> {
    pub(crate) fn new() -> Self {
        MetricRegistry {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the handle registered under `name`, calling `create` if there is none yet.
    ///
    /// `create` runs at most once per name, and no caller gets the handle before it returns.
    pub(crate) fn get_or_create<F>(&self, name: &str, create: F) -> Arc<T>
    where
        F: FnOnce() -> Arc<T>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.get(name) {
                Some(slot) => slot.clone(),
                None => {
                    let slot: Slot<T> = Arc::default();
                    slots.insert(name.to_string(), slot.clone());
                    slot
                }
            }
        };

        slot.get_or_init(create).clone()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl<T> Default for MetricRegistry<T> {
    fn default() -> Self {
        MetricRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::MetricRegistry;

    #[test]
    fn test_create_once() {
        let registry = MetricRegistry::new();
        let created = AtomicUsize::new(0);

        let first = registry.get_or_create("a", || {
            created.fetch_add(1, Ordering::SeqCst);
            Arc::new(1)
        });
        let second = registry.get_or_create("a", || {
            created.fetch_add(1, Ordering::SeqCst);
            Arc::new(2)
        });

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, 1);
        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(registry.names(), ["a"]);
    }

    #[test]
    fn test_concurrent_creators_share_one_handle() {
        const THREADS: usize = 16;

        let registry = Arc::new(MetricRegistry::new());
        let created = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let workers: Vec<_> = (0..THREADS)
            .map(|i| {
                let registry = registry.clone();
                let created = created.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    registry.get_or_create("x", || {
                        created.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(10));
                        Arc::new(i)
                    })
                })
            })
            .collect();

        let handles: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

        assert_eq!(created.load(Ordering::SeqCst), 1);
        for handle in &handles {
            assert!(Arc::ptr_eq(handle, &handles[0]));
        }
    }
}
