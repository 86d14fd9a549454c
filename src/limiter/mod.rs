//! Bounded work limiter.
//!
//! A single counting semaphore caps how many units of work run at once across
//! every pipeline stage. Alongside it, an outstanding-work counter tracks units
//! that are scheduled but not finished (queued or running), so the run knows when
//! it has drained.
//!
//! A unit holds exactly one permit while it runs and never waits for a second.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::warn;
use tokio::sync::{Notify, Semaphore};

struct Inner {
    semaphore: Arc<Semaphore>,
    outstanding: AtomicUsize,
    drained: Notify,
}

/// Shared handle to the run's work limiter.
#[derive(Clone)]
pub struct WorkLimiter {
    inner: Arc<Inner>,
}

/// Scoped registration of one outstanding unit.
///
/// Dropping the ticket (on completion, error or panic unwinding) marks the unit
/// done and wakes drain waiters when the count reaches zero.
pub struct WorkTicket {
    inner: Arc<Inner>,
}

impl Drop for WorkTicket {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}

impl WorkLimiter {
    /// Creates a limiter allowing `size` concurrently running units (at least one).
    pub fn new(size: usize) -> Self {
        WorkLimiter {
            inner: Arc::new(Inner {
                semaphore: Arc::new(Semaphore::new(size.max(1))),
                outstanding: AtomicUsize::new(0),
                drained: Notify::new(),
            }),
        }
    }

    /// Registers one outstanding unit synchronously.
    ///
    /// Callers that schedule work from inside another unit must take the ticket
    /// before their own unit finishes, so the count never touches zero in between.
    pub fn ticket(&self) -> WorkTicket {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkTicket {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Schedules `fut` as a unit of work.
    ///
    /// The unit is counted as outstanding immediately and starts running once a
    /// permit is free. Never blocks the caller.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.ticket();
        let semaphore = Arc::clone(&self.inner.semaphore);
        tokio::spawn(async move {
            let _ticket = ticket;
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Work limiter closed, dropping unit");
                    return;
                }
            };
            fut.await;
        });
    }

    /// Units scheduled but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.inner.semaphore.available_permits()
    }

    /// Waits until no unit is outstanding.
    pub async fn wait_for_drain(&self) {
        loop {
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent final drop is not missed
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}
