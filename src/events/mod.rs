//! In-process event dispatch between pipeline stages.
//!
//! Stages subscribe handlers to a `Topic`. Publishing an `Event` schedules every
//! handler of its topic as its own unit of work on the `WorkLimiter`; the
//! publisher never waits for them and no ordering is guaranteed between them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::BoxFuture;
use futures::FutureExt;
use log::trace;
use strum::EnumIter;

use crate::limiter::WorkLimiter;

/// Pipeline topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Topic {
    HostDiscovered,
    PortOpen,
    UrlClassified,
    UrlResponsive,
    RunEnding,
}

/// A message carried between stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A host to port-scan.
    HostDiscovered(String),
    /// A TCP port that accepted a connection.
    PortOpen { port: u16, host: String },
    /// A URL whose scheme is known and that should be requested.
    UrlClassified(String),
    /// A URL that returned an HTTP response; its artifacts are on disk.
    UrlResponsive(String),
    /// Broadcast once after the run has drained.
    RunEnding,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::HostDiscovered(_) => Topic::HostDiscovered,
            Event::PortOpen { .. } => Topic::PortOpen,
            Event::UrlClassified(_) => Topic::UrlClassified,
            Event::UrlResponsive(_) => Topic::UrlResponsive,
            Event::RunEnding => Topic::RunEnding,
        }
    }
}

type Handler = Arc<dyn Fn(Event) -> BoxFuture<'static, ()> + Send + Sync>;

/// Topic registry and dispatcher.
pub struct EventBus {
    handlers: RwLock<HashMap<Topic, Vec<Handler>>>,
    limiter: WorkLimiter,
}

impl EventBus {
    pub fn new(limiter: WorkLimiter) -> Self {
        EventBus {
            handlers: RwLock::new(HashMap::new()),
            limiter,
        }
    }

    pub fn limiter(&self) -> &WorkLimiter {
        &self.limiter
    }

    /// Registers `handler` for every event published on `topic`.
    pub fn subscribe<F, Fut>(&self, topic: Topic, handler: F)
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |event| handler(event).boxed());
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push(handler);
    }

    /// Number of handlers registered for `topic`.
    pub fn subscribers(&self, topic: Topic) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map_or(0, Vec::len)
    }

    /// Drops every registered handler.
    ///
    /// Handlers that capture the bus keep it alive; clearing at the end of a run
    /// releases them.
    pub fn clear(&self) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Schedules every handler of the event's topic. Returns immediately.
    ///
    /// Each invocation is registered as outstanding work before this returns.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        trace!("Publishing {:?} to {} handler(s)", event, handlers.len());
        for handler in handlers {
            self.limiter.spawn(handler(event.clone()));
        }
    }
}
