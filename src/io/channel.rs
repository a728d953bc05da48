/*
 * Completion Channel Abstraction
 *
 * A completion channel is the one-way, byte-oriented pipe through which a
 * task's owner learns that the task finished. Policies write exactly one
 * frame per task and never read.
 *
 * Delivery is best effort: a failed or short write is logged by the caller
 * and never retried.
 */

use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use spin::Mutex;

use super::message::{CompletionMessage, MessageError};

/// Write-side errors of a completion channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The receiving end is gone
    Closed,

    /// The channel cannot take data right now
    WouldBlock,

    /// Any other transport failure
    Io,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::Closed => f.write_str("channel closed"),
            ChannelError::WouldBlock => f.write_str("channel would block"),
            ChannelError::Io => f.write_str("channel I/O error"),
        }
    }
}

impl core::error::Error for ChannelError {}

/// One-way byte channel toward a task's owner
///
/// Implementations must not block. Returns the number of bytes accepted.
pub trait CompletionChannel: Send + Sync {
    fn write(&self, buf: &[u8]) -> Result<usize, ChannelError>;
}

/// In-memory channel that records every frame written to it
///
/// Used as the test double for notification delivery, and handy for hosts
/// that want to inspect completions without real I/O. Switch it to failing
/// mode with `set_failing(true)` to exercise the error path.
#[derive(Default)]
pub struct RecordingChannel {
    frames: Mutex<Vec<Vec<u8>>>,
    failing: AtomicBool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel whose writes always fail with `ChannelError::Closed`
    pub fn failing() -> Self {
        let channel = Self::new();
        channel.set_failing(true);
        channel
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// Number of frames accepted so far
    pub fn frame_count(&self) -> usize {
        self.frames.lock().len()
    }

    /// Decode every accepted frame, in arrival order
    pub fn messages(&self) -> Result<Vec<CompletionMessage>, MessageError> {
        self.frames
            .lock()
            .iter()
            .map(|frame| CompletionMessage::decode(frame))
            .collect()
    }
}

impl CompletionChannel for RecordingChannel {
    fn write(&self, buf: &[u8]) -> Result<usize, ChannelError> {
        if self.failing.load(Ordering::Acquire) {
            return Err(ChannelError::Closed);
        }
        self.frames.lock().push(buf.to_vec());
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::types::TaskId;

    #[test]
    fn test_recording_channel() {
        let channel = RecordingChannel::new();
        let frame = CompletionMessage::done(TaskId(3), 40).encode();
        assert_eq!(channel.write(&frame), Ok(frame.len()));

        let messages = channel.messages().unwrap();
        assert_eq!(messages, [CompletionMessage::done(TaskId(3), 40)]);
    }

    #[test]
    fn test_failing_channel_drops_frames() {
        let channel = RecordingChannel::failing();
        let frame = CompletionMessage::done(TaskId(3), 40).encode();
        assert_eq!(channel.write(&frame), Err(ChannelError::Closed));
        assert_eq!(channel.frame_count(), 0);

        channel.set_failing(false);
        assert!(channel.write(&frame).is_ok());
        assert_eq!(channel.frame_count(), 1);
    }
}
