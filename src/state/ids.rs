use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

/// Milliseconds since the Unix epoch, or zero if the clock is before it.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Allocates participant ids from the wall clock, bumping past the previous id when two
/// allocations land in the same millisecond (or the clock steps back).
#[derive(Debug, Default)]
pub struct ParticipantIds {
    last: AtomicU64,
}

impl ParticipantIds {
    /// Create an allocator that has not issued anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, strictly greater than every id issued before.
    pub fn next_id(&self) -> String {
        self.next_at(epoch_millis()).to_string()
    }

    fn next_at(&self, now: u64) -> u64 {
        let issue = |last: u64| now.max(last + 1);
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(issue(last)))
        {
            Ok(previous) | Err(previous) => issue(previous),
        }
    }
}
