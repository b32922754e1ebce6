//! Deferred completions for asynchronous file reads.
//!
//! The UI model is single-threaded and event-driven: a file read started by
//! an overlay completes later on the same event loop. Completions queue
//! here in FIFO order and are applied by `GallerySession::pump`, which
//! checks that the owning overlay is still open before touching it. A
//! completion for a closed overlay is dropped silently.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::overlay::OverlayId;

/// A finished file read waiting to be applied to its overlay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRead {
    /// The overlay that started the read.
    pub overlay: OverlayId,

    /// Name of the file that was read.
    pub file_name: String,

    /// The file's content.
    pub bytes: Vec<u8>,
}

/// FIFO queue of pending read completions.
#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<PendingRead>,
}

impl TaskQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completion.
    pub fn push(&mut self, read: PendingRead) {
        self.queue.push_back(read);
    }

    /// Take the oldest completion.
    pub fn pop(&mut self) -> Option<PendingRead> {
        self.queue.pop_front()
    }

    /// Number of queued completions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
