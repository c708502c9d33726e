//! Generation job lifecycle: submit, poll to a terminal state, resolve
//! the result into a usable media URL

pub mod poll;
pub mod resolve;
pub mod submit;

pub use poll::{PollError, PollProgress};
pub use resolve::{MediaKind, NoMediaUrl};
pub use submit::SubmissionError;
