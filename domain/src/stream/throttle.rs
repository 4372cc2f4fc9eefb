//! Content-edit throttling.
//!
//! Chat platforms rate-limit message edits, so the content message is only
//! re-rendered when enough time has passed since the previous edit. Long
//! bursts with no timing gaps still flush whenever the buffer length lands
//! on a multiple of the chunk size.
//!
//! Only the content message is throttled. Finalization bypasses the policy.

use std::time::Duration;

/// Default length step, in characters, that forces a flush.
pub const DEFAULT_FLUSH_CHUNK_SIZE: usize = 200;

/// Default minimum interval between content edits.
pub const DEFAULT_MIN_EDIT_INTERVAL: Duration = Duration::from_secs(1);

/// Decide whether a content delta should edit the content message now.
///
/// Uses [`DEFAULT_FLUSH_CHUNK_SIZE`] for the length fallback.
pub fn should_emit(accumulated_len: usize, elapsed: Duration, min_interval: Duration) -> bool {
    ThrottlePolicy::new(min_interval).should_emit(accumulated_len, Some(elapsed))
}

/// Throttle configuration for one session's content message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub min_interval: Duration,
    pub chunk_size: usize,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_EDIT_INTERVAL,
            chunk_size: DEFAULT_FLUSH_CHUNK_SIZE,
        }
    }
}

impl ThrottlePolicy {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// `since_last_edit` is `None` when the content message has never been
    /// edited, which always emits.
    pub fn should_emit(&self, accumulated_len: usize, since_last_edit: Option<Duration>) -> bool {
        let Some(elapsed) = since_last_edit else {
            return true;
        };
        elapsed >= self.min_interval || self.on_chunk_boundary(accumulated_len)
    }

    fn on_chunk_boundary(&self, accumulated_len: usize) -> bool {
        self.chunk_size > 0 && accumulated_len > 0 && accumulated_len % self.chunk_size == 0
    }
}
