//! Texture loads driven by the host page.
//!
//! The browser decodes images, not Rust. The cache's loads are parked here
//! until JavaScript asks which images to fetch and reports each result back.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use showroom_render_3d::{LoadCompletion, TextureImage, TextureSource};

#[derive(Default)]
struct QueueState {
    /// Loads awaiting a result, by image reference.
    pending: IndexMap<String, LoadCompletion>,
    /// Image references not yet handed to the host.
    requested: Vec<String>,
}

/// Shared queue of outstanding texture loads.
#[derive(Clone, Default)]
pub struct LoadQueue {
    state: Rc<RefCell<QueueState>>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A texture source feeding this queue.
    pub fn source(&self) -> QueuedSource {
        QueuedSource { queue: self.clone() }
    }

    /// Image references the host should start fetching. Each is returned
    /// once.
    pub fn take_requests(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().requested)
    }

    /// Report the outcome of a fetch. Returns `false` if no load for the
    /// image is waiting.
    pub fn complete(&self, image_ref: &str, result: Result<TextureImage, String>) -> bool {
        let completion = self.state.borrow_mut().pending.shift_remove(image_ref);
        match completion {
            // Resolve outside the borrow: it may wake tasks that touch the queue.
            Some(completion) => {
                completion.resolve(result);
                true
            }
            None => {
                log::debug!("no pending load for {}", image_ref);
                false
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

/// [`TextureSource`] that parks loads in a [`LoadQueue`].
pub struct QueuedSource {
    queue: LoadQueue,
}

impl TextureSource for QueuedSource {
    fn start(&self, image_ref: &str, completion: LoadCompletion) {
        let superseded = {
            let mut state = self.queue.state.borrow_mut();
            let previous = state.pending.insert(image_ref.to_string(), completion);
            if previous.is_none() {
                state.requested.push(image_ref.to_string());
            }
            previous
        };
        // A load restarted after invalidation replaces the stale one, whose
        // waiters must still settle.
        if let Some(stale) = superseded {
            stale.resolve(Err("superseded by a newer load".into()));
        }
    }
}
