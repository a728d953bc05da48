/*
 * Input/Output System
 *
 * Notification side of the scheduler: the completion wire message and the
 * channel abstraction it travels over.
 */

pub mod channel;
pub mod message;

pub use channel::{ChannelError, CompletionChannel, RecordingChannel};
pub use message::{CompletionMessage, FRAME_LEN, MessageError, MessageKind};
