//! seekpos Core Library
//!
//! This library provides the value types used to describe seek targets on a
//! media timeline: rational media times, closed time ranges and
//! tolerance-bounded positions.

pub mod position;
pub mod range;
pub mod time;
pub mod timecode;

pub use position::Position;
pub use range::TimeRange;
pub use time::MediaTime;
pub use timecode::parse_timecode;

/// Result type for seekpos-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for seekpos-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid time code: {0:?}")]
    InvalidTimecode(String),

    #[error("Invalid time range: {start} to {end}")]
    InvalidRange { start: MediaTime, end: MediaTime },
}
