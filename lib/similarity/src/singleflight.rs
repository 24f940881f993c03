//! Single-flight cache for dedup runs.
//!
//! A full duplicate scan is the most expensive operation in the system, so
//! concurrent requests against the same catalog snapshot must not each run
//! their own scan. The cache keys results by the catalog version counter:
//! the first caller for a version computes, everyone else arriving for the
//! same version blocks on a condvar and shares the finished report. A
//! failed computation releases the flight so the next caller retries.

use crate::cluster::DuplicateReport;
use parking_lot::{Condvar, Mutex};
use partx_core::Result;
use std::sync::Arc;
use tracing::debug;

struct CacheState {
    /// Catalog version the cached report was computed against.
    version: u64,
    result: Option<Arc<DuplicateReport>>,
    in_flight: bool,
}

pub struct DedupCache {
    state: Mutex<CacheState>,
    cond: Condvar,
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState {
                version: 0,
                result: None,
                in_flight: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Return the report for `version`, computing it at most once per
    /// version across all threads.
    pub fn get_or_compute<F>(&self, version: u64, compute: F) -> Result<Arc<DuplicateReport>>
    where
        F: FnOnce() -> Result<DuplicateReport>,
    {
        {
            let mut state = self.state.lock();
            loop {
                if state.version == version {
                    if let Some(report) = &state.result {
                        debug!(version, "dedup cache hit");
                        return Ok(Arc::clone(report));
                    }
                }
                if state.in_flight {
                    // A flight is running, possibly for another version.
                    // Never steal the slot mid-flight: at most one
                    // computation runs at a time.
                    self.cond.wait(&mut state);
                    continue;
                }
                // Slot is free: this thread takes the flight.
                state.version = version;
                state.result = None;
                state.in_flight = true;
                break;
            }
        }

        debug!(version, "dedup cache miss, computing");
        let outcome = compute().map(Arc::new);

        // No other thread touches the slot while in_flight is set, so the
        // flight still owns `version` here.
        let mut state = self.state.lock();
        state.in_flight = false;
        if let Ok(report) = &outcome {
            state.result = Some(Arc::clone(report));
        }
        self.cond.notify_all();
        outcome
    }

    /// Cached report for `version`, if a finished flight exists.
    pub fn peek(&self, version: u64) -> Option<Arc<DuplicateReport>> {
        let state = self.state.lock();
        if state.version == version {
            state.result.as_ref().map(Arc::clone)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::cluster;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn empty_report() -> DuplicateReport {
        cluster(&[], &[], 90.0)
    }

    #[test]
    fn test_compute_once_per_version() {
        let cache = DedupCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .get_or_compute(1, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(empty_report())
                })
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache
            .get_or_compute(2, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(empty_report())
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_callers_share_one_flight() {
        let cache = Arc::new(DedupCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    cache
                        .get_or_compute(7, move || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            // Hold the flight long enough for the others to
                            // queue up behind it.
                            std::thread::sleep(Duration::from_millis(50));
                            Ok(empty_report())
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_flights_never_overlap_across_versions() {
        let cache = Arc::new(DedupCache::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        // Callers for different snapshot versions must serialize: a
        // late arrival may not steal the slot while a flight is running.
        let handles: Vec<_> = (1..=4u64)
            .map(|version| {
                let cache = Arc::clone(&cache);
                let active = Arc::clone(&active);
                let max_active = Arc::clone(&max_active);
                std::thread::spawn(move || {
                    cache
                        .get_or_compute(version, move || {
                            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                            max_active.fetch_max(now, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(20));
                            active.fetch_sub(1, Ordering::SeqCst);
                            Ok(empty_report())
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_flight_allows_retry() {
        let cache = DedupCache::new();

        let err = cache.get_or_compute(3, || {
            Err(partx_core::Error::Validation("boom".to_string()))
        });
        assert!(err.is_err());
        assert!(cache.peek(3).is_none());

        cache.get_or_compute(3, || Ok(empty_report())).unwrap();
        assert!(cache.peek(3).is_some());
    }
}
