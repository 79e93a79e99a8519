//! Media timeline description: duration and sync points

use crate::{Error, Result, SeekWindow};
use seekpos_core::{MediaTime, TimeRange};
use tracing::debug;

/// Upper bound on generated sync points
const MAX_SYNC_POINTS: u64 = 1_000_000;

/// The playable extent of a media item, and the times where decoding can
/// start without earlier data (key frames, segment boundaries)
#[derive(Debug, Clone)]
pub struct MediaTimeline {
    range: TimeRange,
    sync_points: Vec<MediaTime>,
}

impl MediaTimeline {
    /// Creates a timeline for media of the given duration
    ///
    /// An indefinite duration (live media) is treated as unbounded. Sync points
    /// outside `[0, duration]` are dropped; the rest are sorted and deduplicated.
    pub fn new(duration: MediaTime, mut sync_points: Vec<MediaTime>) -> Result<Self> {
        let duration = if duration.is_indefinite() {
            debug!("Indefinite media duration, treating timeline as unbounded");
            MediaTime::POSITIVE_INFINITY
        } else {
            duration
        };
        if !duration.is_valid() || duration < MediaTime::ZERO {
            return Err(Error::InvalidDuration(duration));
        }

        let range = TimeRange::new(MediaTime::ZERO, duration)?;

        let total = sync_points.len();
        sync_points.retain(|point| point.is_numeric() && range.contains(*point));
        sync_points.sort();
        sync_points.dedup();
        if sync_points.len() != total {
            debug!(
                "Kept {} of {} sync points within {} to {}",
                sync_points.len(),
                total,
                range.start(),
                range.end()
            );
        }

        Ok(Self { range, sync_points })
    }

    /// Creates a timeline with a sync point every `interval`, starting at the origin
    pub fn with_sync_interval(duration: MediaTime, interval: MediaTime) -> Result<Self> {
        if !interval.is_numeric() || interval <= MediaTime::ZERO {
            return Err(Error::InvalidSyncInterval(interval));
        }
        if !duration.is_numeric() {
            return Err(Error::InvalidDuration(duration));
        }

        let count = (duration.seconds() / interval.seconds()).floor();
        if count >= MAX_SYNC_POINTS as f64 {
            return Err(Error::InvalidSyncInterval(interval));
        }

        let mut sync_points = Vec::with_capacity(count.max(0.0) as usize + 1);
        let mut point = MediaTime::ZERO;
        while point <= duration {
            sync_points.push(point);
            point = point + interval;
        }

        Self::new(duration, sync_points)
    }

    /// Total duration (`+inf` for unbounded media)
    pub fn duration(&self) -> MediaTime {
        self.range.end()
    }

    /// The range `[0, duration]`
    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn sync_points(&self) -> &[MediaTime] {
        &self.sync_points
    }

    /// Last sync point at or before `time`
    pub fn sync_point_at_or_before(&self, time: MediaTime) -> Option<MediaTime> {
        let index = self.sync_points.partition_point(|point| *point <= time);
        index.checked_sub(1).map(|i| self.sync_points[i])
    }

    /// Sync point inside `window` closest to its target. Ties go to the earlier point.
    pub fn nearest_sync_point(&self, window: &SeekWindow) -> Option<MediaTime> {
        let start = self
            .sync_points
            .partition_point(|point| *point < window.lower());
        let end = self
            .sync_points
            .partition_point(|point| *point <= window.upper());

        let candidates = &self.sync_points[start..end.max(start)];
        let target = window.target();
        if target.is_positive_infinity() {
            // Every distance is infinite; the latest point is the closest
            return candidates.last().copied();
        }
        candidates
            .iter()
            .copied()
            .min_by_key(|point| distance(*point, target))
    }
}

fn distance(a: MediaTime, b: MediaTime) -> MediaTime {
    if a <= b {
        b - a
    } else {
        a - b
    }
}
