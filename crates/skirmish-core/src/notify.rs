//! Synchronous listener registry.
//!
//! Listeners are invoked in registration order on the thread that
//! broadcasts. A listener receives `&T` only, so it cannot reach back into
//! the broadcaster and subscribe or unsubscribe mid-broadcast.

use std::fmt;

/// Handle returned by [`Broadcaster::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// Registry of callbacks for events of type `T`.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use skirmish_core::notify::Broadcaster;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let mut damaged = Broadcaster::new();
/// let id = damaged.subscribe(move |amount: &f32| sink.lock().unwrap().push(*amount));
/// damaged.broadcast(&5.0);
/// damaged.unsubscribe(id);
/// damaged.broadcast(&7.0);
///
/// assert_eq!(*seen.lock().unwrap(), vec![5.0]);
/// ```
pub struct Broadcaster<T> {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener<T>)>,
}

impl<T> Broadcaster<T> {
    /// Create an empty broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Invoke every listener with `event`.
    pub fn broadcast(&mut self, event: &T) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
