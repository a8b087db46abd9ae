//! Ingress queue between the transport and the consumers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fbmqtt_domain::message::Message;

/// Unbounded FIFO of decoded messages.
///
/// Cloning yields another handle to the same queue: the transport appends
/// through one handle while the drain task dequeues through another. The
/// lock is only held for a single push or pop.
#[derive(Debug, Clone, Default)]
pub struct IngressQueue {
    inner: Arc<Mutex<VecDeque<Message>>>,
}

impl IngressQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the back of the queue.
    pub fn append(&self, message: Message) {
        tracing::trace!(kind = message.kind(), device = %message.header().device, "queued message");
        self.lock().push_back(message);
    }

    /// Take the oldest message, if any.
    #[must_use]
    pub fn dequeue(&self) -> Option<Message> {
        self.lock().pop_front()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
