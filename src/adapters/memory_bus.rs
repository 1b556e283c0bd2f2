//! In-process pub/sub bus.
//!
//! Same delivery semantics as Redis pub/sub: fan-out to every live
//! subscription on the topic, nothing retained for late subscribers, and
//! a publish with no listeners is silently dropped.  Used to run a
//! publisher and an actuator against each other without a broker.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::app::ports::{Publisher, Subscriber};
use crate::error::BusError;
use crate::message::Topic;

type Queue = Arc<Mutex<VecDeque<Vec<u8>>>>;

#[derive(Default)]
struct Inner {
    subscribers: Vec<(Topic, Weak<Mutex<VecDeque<Vec<u8>>>>)>,
    closed: bool,
    dropped: u64,
}

/// Cloneable handle to one shared bus.
#[derive(Clone, Default)]
pub struct MemoryBus {
    inner: Arc<Mutex<Inner>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: Topic) -> MemorySubscription {
        let queue: Queue = Arc::default();
        lock(&self.inner)
            .subscribers
            .push((topic.clone(), Arc::downgrade(&queue)));
        MemorySubscription {
            topic,
            queue,
            bus: Arc::clone(&self.inner),
        }
    }

    /// Tear the bus down.  Subscribers drain what is already queued, then
    /// get [`BusError::Closed`]; publishers fail immediately.
    pub fn close(&self) {
        lock(&self.inner).closed = true;
    }

    /// Payloads published while nobody was subscribed to their topic.
    pub fn dropped(&self) -> u64 {
        lock(&self.inner).dropped
    }

    /// Deliver `payload` and return how many subscriptions received it.
    pub fn deliver(&self, topic: &Topic, payload: &[u8]) -> Result<usize, BusError> {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return Err(BusError::Closed);
        }

        inner.subscribers.retain(|(_, q)| q.strong_count() > 0);
        let mut receivers = 0;
        for (_, queue) in inner.subscribers.iter().filter(|(t, _)| t == topic) {
            if let Some(queue) = queue.upgrade() {
                lock(&queue).push_back(payload.to_vec());
                receivers += 1;
            }
        }
        if receivers == 0 {
            inner.dropped += 1;
        }
        Ok(receivers)
    }
}

impl Publisher for MemoryBus {
    fn publish(&mut self, topic: &Topic, payload: &[u8]) -> Result<(), BusError> {
        self.deliver(topic, payload).map(drop)
    }
}

pub struct MemorySubscription {
    topic: Topic,
    queue: Queue,
    bus: Arc<Mutex<Inner>>,
}

impl Subscriber for MemorySubscription {
    /// Never blocks: an empty queue on an open bus is `Ok(None)`.
    fn next_message(&mut self) -> Result<Option<Vec<u8>>, BusError> {
        if let Some(payload) = lock(&self.queue).pop_front() {
            return Ok(Some(payload));
        }
        if lock(&self.bus).closed {
            return Err(BusError::Closed);
        }
        Ok(None)
    }

    fn topic(&self) -> &Topic {
        &self.topic
    }
}
