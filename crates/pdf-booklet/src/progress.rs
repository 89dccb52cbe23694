//! Progress reporting

use crate::constants::{PROGRESS_DONE, PROGRESS_PLANNED};
use tokio::sync::mpsc::UnboundedSender;

/// Receives progress while a booklet is created.
///
/// Percentages never decrease during one run and end at 100 on success.
pub trait ProgressSink: Send + Sync {
    fn progress(&self, percent: u8);
    fn status(&self, message: &str);
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn progress(&self, _percent: u8) {}
    fn status(&self, _message: &str) {}
}

/// Forwards progress to a pair of callbacks
pub struct CallbackProgress<P, S> {
    on_progress: P,
    on_status: S,
}

impl<P, S> CallbackProgress<P, S>
where
    P: Fn(u8) + Send + Sync,
    S: Fn(&str) + Send + Sync,
{
    pub fn new(on_progress: P, on_status: S) -> Self {
        Self {
            on_progress,
            on_status,
        }
    }
}

impl<P, S> ProgressSink for CallbackProgress<P, S>
where
    P: Fn(u8) + Send + Sync,
    S: Fn(&str) + Send + Sync,
{
    fn progress(&self, percent: u8) {
        (self.on_progress)(percent)
    }

    fn status(&self, message: &str) {
        (self.on_status)(message)
    }
}

/// Progress as a message, for channel-based consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookletUpdate {
    Progress(u8),
    Status(String),
}

impl ProgressSink for UnboundedSender<BookletUpdate> {
    fn progress(&self, percent: u8) {
        // A dropped receiver only means nobody is listening
        let _ = self.send(BookletUpdate::Progress(percent));
    }

    fn status(&self, message: &str) {
        let _ = self.send(BookletUpdate::Status(message.to_string()));
    }
}

/// Checkpoint reached after chunk `index` (0-based) of `total` is saved
pub fn chunk_checkpoint(index: usize, total: usize) -> u8 {
    let span = usize::from(PROGRESS_DONE - PROGRESS_PLANNED);
    let done = span * (index + 1) / total.max(1);
    PROGRESS_PLANNED + done.min(span) as u8
}
