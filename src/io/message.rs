/*
 * Completion Message
 *
 * Fixed-size wire frame sent to a task's owner once the task has consumed
 * its whole processor budget.
 *
 * Layout (little-endian, 16 bytes):
 * - offset 0:  task id   (u32)
 * - offset 4:  kind      (u32, Done = 1)
 * - offset 8:  time (ms) (u64)
 */

use core::fmt;

use crate::scheduler::types::{Millis, TaskId};

/// Size of an encoded completion frame in bytes
pub const FRAME_LEN: usize = 16;

/// Message discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageKind {
    /// The task finished its processor budget
    Done = 1,
}

impl MessageKind {
    fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(MessageKind::Done),
            _ => None,
        }
    }
}

/// Frame decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// Fewer than `FRAME_LEN` bytes were supplied
    Truncated { len: usize },

    /// The kind field holds an unknown discriminator
    UnknownKind(u32),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::Truncated { len } => {
                write!(f, "frame truncated: {} of {} bytes", len, FRAME_LEN)
            }
            MessageError::UnknownKind(raw) => write!(f, "unknown message kind {}", raw),
        }
    }
}

impl core::error::Error for MessageError {}

/// Completion notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionMessage {
    pub task_id: TaskId,
    pub kind: MessageKind,
    pub time_ms: Millis,
}

impl CompletionMessage {
    /// Build a Done message for `task_id` stamped at `time_ms`
    pub fn done(task_id: TaskId, time_ms: Millis) -> Self {
        Self {
            task_id,
            kind: MessageKind::Done,
            time_ms,
        }
    }

    /// Encode into a fixed-size frame
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[0..4].copy_from_slice(&self.task_id.0.to_le_bytes());
        frame[4..8].copy_from_slice(&(self.kind as u32).to_le_bytes());
        frame[8..16].copy_from_slice(&self.time_ms.to_le_bytes());
        frame
    }

    /// Decode a frame produced by `encode`
    ///
    /// Trailing bytes beyond `FRAME_LEN` are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        if bytes.len() < FRAME_LEN {
            return Err(MessageError::Truncated { len: bytes.len() });
        }

        let mut word = [0u8; 4];
        word.copy_from_slice(&bytes[0..4]);
        let task_id = TaskId(u32::from_le_bytes(word));

        word.copy_from_slice(&bytes[4..8]);
        let raw_kind = u32::from_le_bytes(word);
        let kind = MessageKind::from_u32(raw_kind).ok_or(MessageError::UnknownKind(raw_kind))?;

        let mut time = [0u8; 8];
        time.copy_from_slice(&bytes[8..16]);

        Ok(Self {
            task_id,
            kind,
            time_ms: u64::from_le_bytes(time),
        })
    }
}
