//! seekpos Player Library
//!
//! This library consumes positions the way a playback engine does: it derives
//! the reachable window of a position, keeps it inside an optional segment,
//! picks the time to seek to and serializes overlapping seek requests.

pub mod controller;
pub mod resolver;
pub mod timeline;
pub mod window;

pub use controller::{SeekController, SeekOutcome, SeekTicket};
pub use resolver::{ResolverConfig, SeekPlan, SeekResolver};
pub use timeline::MediaTimeline;
pub use window::SeekWindow;

use seekpos_core::MediaTime;

/// Result type for seekpos-player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for seekpos-player operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("seekpos core error: {0}")]
    Core(#[from] seekpos_core::Error),

    #[error("Segment {start} to {end} lies outside the media (duration {duration})")]
    SegmentOutOfRange {
        start: MediaTime,
        end: MediaTime,
        duration: MediaTime,
    },

    #[error("Invalid media duration: {0}")]
    InvalidDuration(MediaTime),

    #[error("Invalid sync point interval: {0}")]
    InvalidSyncInterval(MediaTime),
}
