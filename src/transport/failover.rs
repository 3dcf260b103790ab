use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use quanta::{Clock, Instant};
use tracing::debug;

/// In-memory queue of requests that could not be delivered.
pub(crate) struct FailoverCache<T> {
    clock: Clock,
    duration: Option<Duration>,
    max_size: Option<usize>,
    pending: Mutex<VecDeque<(Instant, T)>>,
}

impl<T> FailoverCache<T> {
    pub(crate) fn new(clock: Clock, duration: Option<Duration>, max_size: Option<usize>) -> Self {
        FailoverCache {
            clock,
            duration,
            max_size,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, request: T) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.push_back((self.clock.now(), request));
        self.evict(&mut pending);
    }

    /// Replays queued requests oldest first, stopping at the first one `send` fails on.
    ///
    /// The failed request stays at the front with its original enqueue time.
    pub(crate) fn retry<F>(&self, mut send: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict(&mut pending);
        while let Some((queued_at, request)) = pending.pop_front() {
            if !send(&request) {
                pending.push_front((queued_at, request));
                break;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.len()
    }

    fn evict(&self, pending: &mut VecDeque<(Instant, T)>) {
        if let Some(duration) = self.duration {
            let now = self.clock.now();
            while let Some((queued_at, _)) = pending.front() {
                if now.duration_since(*queued_at) <= duration {
                    break;
                }
                pending.pop_front();
                debug!("dropping expired request from failover cache");
            }
        }
        if let Some(max_size) = self.max_size {
            while pending.len() > max_size {
                pending.pop_front();
                debug!("failover cache is full, dropping oldest request");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use quanta::Clock;

    use super::FailoverCache;

    #[test]
    fn test_retry_in_order_until_failure() {
        let (clock, _mock) = Clock::mock();
        let cache = FailoverCache::new(clock, None, None);
        cache.push(1);
        cache.push(2);
        cache.push(3);

        let mut sent = Vec::new();
        cache.retry(|r| {
            if *r == 2 {
                return false;
            }
            sent.push(*r);
            true
        });
        assert_eq!(sent, [1]);
        assert_eq!(cache.len(), 2);

        cache.retry(|r| {
            sent.push(*r);
            true
        });
        assert_eq!(sent, [1, 2, 3]);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_expired_requests_are_dropped() {
        let (clock, mock) = Clock::mock();
        let cache = FailoverCache::new(clock, Some(Duration::from_secs(600)), None);
        cache.push("old");
        mock.increment(Duration::from_secs(300));
        cache.push("recent");
        mock.increment(Duration::from_secs(301));

        let mut sent = Vec::new();
        cache.retry(|r| {
            sent.push(*r);
            true
        });
        assert_eq!(sent, ["recent"]);
    }

    #[test]
    fn test_max_size_drops_oldest() {
        let (clock, _mock) = Clock::mock();
        let cache = FailoverCache::new(clock, None, Some(2));
        cache.push(1);
        cache.push(2);
        cache.push(3);
        assert_eq!(cache.len(), 2);

        let mut sent = Vec::new();
        cache.retry(|r| {
            sent.push(*r);
            true
        });
        assert_eq!(sent, [2, 3]);
    }
}
