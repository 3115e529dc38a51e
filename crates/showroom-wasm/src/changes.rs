//! State changes buffered for JavaScript listeners.
//!
//! Registry notifications fire in the middle of an engine call, while the
//! engine is still borrowed. Listeners that read the engine back would be
//! rejected, so changes are queued here and delivered once the call returns.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::StateChangeJs;

/// Shared FIFO of pending change notifications.
#[derive(Clone, Default)]
pub struct ChangeQueue {
    pending: Rc<RefCell<Vec<StateChangeJs>>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a change. Returns `true` when the queue was empty, i.e. when a
    /// delivery needs to be scheduled.
    pub fn push(&self, change: StateChangeJs) -> bool {
        let mut pending = self.pending.borrow_mut();
        pending.push(change);
        pending.len() == 1
    }

    /// Deliver every queued change in order. Changes queued by `deliver`
    /// itself wait for the next flush.
    pub fn flush(&self, mut deliver: impl FnMut(&StateChangeJs)) -> usize {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        for change in &batch {
            deliver(change);
        }
        batch.len()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
