//! Seek resolution: turns a position into a concrete time to seek to

use crate::{Error, MediaTimeline, Result, SeekWindow};
use seekpos_core::{MediaTime, Position, TimeRange};
use tracing::{debug, warn};

/// Resolver configuration
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResolverConfig {
    /// Land on a sync point when one lies inside the reachable window
    pub snap_to_sync_points: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            snap_to_sync_points: true,
        }
    }
}

/// Outcome of resolving a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeekPlan {
    /// The requested position
    pub position: Position,
    /// Reachable window, restricted to the playable range
    pub window: SeekWindow,
    /// Time the seek lands on
    pub resolved: MediaTime,
    /// Sync point decoding has to start from to reach `resolved`
    pub decode_from: MediaTime,
    /// Whether `resolved` is a sync point picked within the tolerances
    pub snapped: bool,
}

/// Resolves positions against a media timeline
pub struct SeekResolver {
    timeline: MediaTimeline,
    config: ResolverConfig,
}

impl SeekResolver {
    pub fn new(timeline: MediaTimeline, config: ResolverConfig) -> Self {
        Self { timeline, config }
    }

    /// Resolves `position`, optionally keeping the result inside `segment`
    ///
    /// The segment is intersected with the media range first; a segment lying
    /// entirely outside the media is rejected.
    pub fn resolve(&self, position: &Position, segment: Option<&TimeRange>) -> Result<SeekPlan> {
        let media = self.timeline.range();
        let playable = match segment {
            Some(segment) => media.intersection(segment).ok_or_else(|| {
                warn!(
                    "Rejecting segment {} to {}: outside media of duration {}",
                    segment.start(),
                    segment.end(),
                    self.timeline.duration()
                );
                Error::SegmentOutOfRange {
                    start: segment.start(),
                    end: segment.end(),
                    duration: self.timeline.duration(),
                }
            })?,
            None => media,
        };

        let window = SeekWindow::for_position(position).constrain(&playable);

        let sync_point = if self.config.snap_to_sync_points {
            self.timeline.nearest_sync_point(&window)
        } else {
            None
        };
        let resolved = sync_point.unwrap_or(window.target());
        let decode_from = self
            .timeline
            .sync_point_at_or_before(resolved)
            .unwrap_or(MediaTime::ZERO);

        debug!(
            "Resolved {} (window {} to {}) to {}, decoding from {}",
            position.time(),
            window.lower(),
            window.upper(),
            resolved,
            decode_from
        );

        Ok(SeekPlan {
            position: *position,
            window,
            resolved,
            decode_from,
            snapped: sync_point.is_some(),
        })
    }

    /// Gets a reference to the underlying timeline
    pub fn timeline(&self) -> &MediaTimeline {
        &self.timeline
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}
