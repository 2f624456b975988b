//! Callback registry: the scheduler every animation registers into.
//!
//! The registry owns no timer. The host calls [`Registry::tick`] at its own
//! cadence and every registered callback runs once, in registration order.
//!
//! `tick` iterates over a snapshot of the registrations taken when the tick
//! starts. Callbacks may register or deregister (themselves or others) while
//! the tick is running; those changes take effect from the next tick on and
//! never disturb the iteration in progress.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::warn;

use crate::ids::{CallbackId, IdAllocator};

/// Returned by an update callback after each invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// Keep the callback registered.
    Continue,
    /// The callback is done; the registry drops it after this call.
    Finished,
}

pub type UpdateCallback = Box<dyn FnMut() -> TickStatus>;

type SharedCallback = Rc<RefCell<UpdateCallback>>;

#[derive(Default)]
struct Inner {
    ids: IdAllocator,
    // Insertion order is the invocation order.
    entries: Vec<(CallbackId, SharedCallback)>,
}

/// Insertion-ordered set of update callbacks.
///
/// Cloning yields another handle to the same registry. Single-threaded by
/// construction (`Rc`), matching the cooperative tick model.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Rc<RefCell<Inner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback; it runs from the next tick on.
    pub fn register(&self, callback: impl FnMut() -> TickStatus + 'static) -> CallbackId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.ids.alloc_callback();
        let boxed: UpdateCallback = Box::new(callback);
        inner.entries.push((id, Rc::new(RefCell::new(boxed))));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn deregister(&self, id: CallbackId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|(entry, _)| *entry != id);
        inner.entries.len() != before
    }

    pub fn is_registered(&self, id: CallbackId) -> bool {
        self.inner
            .borrow()
            .entries
            .iter()
            .any(|(entry, _)| *entry == id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Drop every registered callback without invoking it.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    /// Invoke every currently registered callback once.
    pub fn tick(&self) {
        let snapshot: Vec<(CallbackId, SharedCallback)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        for (id, callback) in snapshot {
            let status = match callback.try_borrow_mut() {
                Ok(mut update) => (*update)(),
                Err(_) => {
                    // Only possible when a callback ticks the registry from inside itself.
                    warn!("skipping re-entrant update callback {:?}", id);
                    continue;
                }
            };
            if status == TickStatus::Finished {
                self.deregister(id);
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.len())
            .finish()
    }
}
