//! Scheduled polling of the console endpoints plus the pure helpers the
//! widgets need to turn raw readings into display text.

pub mod format;
pub mod poller;
pub mod rate;

pub use format::{format_bitrate, format_bytes, format_uptime};
pub use poller::{PollTask, SequenceGen};
pub use rate::{compute_rate, RateTracker};
