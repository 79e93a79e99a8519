//! Reachable windows derived from positions

use seekpos_core::{MediaTime, Position, TimeRange};

/// The span of times a seek may land on to honor a position
///
/// Always satisfies `lower <= target <= upper`, with `lower` never before the
/// timeline origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeekWindow {
    target: MediaTime,
    lower: MediaTime,
    upper: MediaTime,
}

impl SeekWindow {
    /// Computes `[time - before, time + after]`, saturated at the origin
    pub fn for_position(position: &Position) -> Self {
        let origin = MediaTime::ZERO;
        let target = position.time().max(origin);

        let before = position.tolerance_before();
        let lower = if before.is_positive_infinity() {
            origin
        } else {
            (target - before).max(origin)
        };

        let after = position.tolerance_after();
        let upper = if after.is_positive_infinity() {
            MediaTime::POSITIVE_INFINITY
        } else {
            target + after
        };

        Self {
            target,
            lower,
            upper,
        }
    }

    /// Restricts the window to `range`
    ///
    /// The target is clamped into the range. If the window does not overlap the
    /// range at all, it collapses onto the clamped target.
    pub fn constrain(&self, range: &TimeRange) -> Self {
        let target = range.clamp(self.target);
        let lower = self.lower.max(range.start());
        let upper = self.upper.min(range.end());

        if lower > upper {
            Self {
                target,
                lower: target,
                upper: target,
            }
        } else {
            Self {
                target,
                lower,
                upper,
            }
        }
    }

    /// The nominal time, moved onto the timeline if needed
    pub fn target(&self) -> MediaTime {
        self.target
    }

    pub fn lower(&self) -> MediaTime {
        self.lower
    }

    pub fn upper(&self) -> MediaTime {
        self.upper
    }

    pub fn contains(&self, time: MediaTime) -> bool {
        self.lower <= time && time <= self.upper
    }

    /// Checks if the window admits a single time only
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }
}
