use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Caller-supplied budget for a batch computation.
///
/// All batch operations (similarity scan, edge rebuild, clustering) are
/// CPU-bound and must not block indefinitely; they poll the budget between
/// units of work and abort with [`Error::ComputationTimeout`] once the
/// deadline passes or the handle is cancelled.
#[derive(Debug, Clone)]
pub struct ComputeBudget {
    started: Instant,
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

/// Handle for aborting an in-progress computation from another thread.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl ComputeBudget {
    /// A budget with no deadline; still cancellable.
    pub fn unbounded() -> Self {
        Self {
            started: Instant::now(),
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: Some(started + timeout),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: self.cancelled.clone(),
        }
    }

    /// Poll the budget; cheap enough to call per scanned row.
    pub fn check(&self) -> Result<()> {
        if self.cancelled.load(Ordering::Acquire) {
            return Err(self.timeout_error());
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                return Err(self.timeout_error());
            }
        }
        Ok(())
    }

    fn timeout_error(&self) -> Error {
        Error::ComputationTimeout {
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

impl Default for ComputeBudget {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_never_times_out() {
        let budget = ComputeBudget::unbounded();
        assert!(budget.check().is_ok());
    }

    #[test]
    fn test_expired_deadline() {
        let budget = ComputeBudget::with_timeout(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(matches!(
            budget.check(),
            Err(Error::ComputationTimeout { .. })
        ));
    }

    #[test]
    fn test_cancellation() {
        let budget = ComputeBudget::unbounded();
        let handle = budget.cancel_handle();
        assert!(budget.check().is_ok());
        handle.cancel();
        assert!(budget.check().is_err());
    }
}
