//! Closed time ranges, used to describe segments of a media timeline

use crate::{Error, MediaTime, Result};

/// A closed range `[start, end]` of valid media times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RangeRepr")
)]
pub struct TimeRange {
    start: MediaTime,
    end: MediaTime,
}

impl TimeRange {
    /// Creates a range from its bounds
    ///
    /// Fails if a bound is invalid or indefinite, or if `start > end`.
    pub fn new(start: MediaTime, end: MediaTime) -> Result<Self> {
        if !start.is_valid() || !end.is_valid() || start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from a start time and a non-negative duration
    pub fn from_start_duration(start: MediaTime, duration: MediaTime) -> Result<Self> {
        if !duration.is_valid() || duration < MediaTime::ZERO {
            return Err(Error::InvalidRange {
                start,
                end: start + duration,
            });
        }
        Self::new(start, start + duration)
    }

    pub fn start(&self) -> MediaTime {
        self.start
    }

    pub fn end(&self) -> MediaTime {
        self.end
    }

    /// Returns `end - start`
    pub fn duration(&self) -> MediaTime {
        if self.start == self.end {
            MediaTime::ZERO
        } else {
            self.end - self.start
        }
    }

    /// Checks if the range has zero length
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Checks if `time` lies within the range, bounds included
    pub fn contains(&self, time: MediaTime) -> bool {
        self.start <= time && time <= self.end
    }

    /// Returns the time of the range closest to `time`
    pub fn clamp(&self, time: MediaTime) -> MediaTime {
        time.clamp(self.start, self.end)
    }

    /// Returns the overlap of two ranges, if any
    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(TimeRange { start, end })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RangeRepr {
    start: MediaTime,
    end: MediaTime,
}

#[cfg(feature = "serde")]
impl TryFrom<RangeRepr> for TimeRange {
    type Error = Error;

    fn try_from(repr: RangeRepr) -> Result<Self> {
        TimeRange::new(repr.start, repr.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(seconds: f64) -> MediaTime {
        MediaTime::from_seconds(seconds)
    }

    #[test]
    fn test_rejects_reversed_range() {
        assert!(matches!(
            TimeRange::new(secs(10.0), secs(5.0)),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_bounds() {
        assert!(TimeRange::new(MediaTime::INVALID, secs(5.0)).is_err());
        assert!(TimeRange::new(secs(0.0), MediaTime::INDEFINITE).is_err());
        assert!(TimeRange::new(secs(0.0), MediaTime::POSITIVE_INFINITY).is_ok());
    }

    #[test]
    fn test_from_start_duration() {
        let range = TimeRange::from_start_duration(secs(40.0), secs(20.0)).unwrap();
        assert_eq!(range.end(), secs(60.0));
        assert_eq!(range.duration(), secs(20.0));
        assert!(TimeRange::from_start_duration(secs(40.0), secs(-1.0)).is_err());
    }

    #[test]
    fn test_duration_of_infinite_ranges() {
        let open = TimeRange::new(secs(0.0), MediaTime::POSITIVE_INFINITY).unwrap();
        assert!(open.duration().is_positive_infinity());

        let point = TimeRange::new(MediaTime::POSITIVE_INFINITY, MediaTime::POSITIVE_INFINITY).unwrap();
        assert_eq!(point.duration(), MediaTime::ZERO);
        assert!(point.is_empty());
    }

    #[test]
    fn test_contains_and_clamp() {
        let range = TimeRange::new(secs(40.0), secs(60.0)).unwrap();
        assert!(range.contains(secs(40.0)));
        assert!(range.contains(secs(60.0)));
        assert!(!range.contains(secs(60.5)));
        assert_eq!(range.clamp(secs(10.0)), secs(40.0));
        assert_eq!(range.clamp(secs(50.0)), secs(50.0));
        assert_eq!(range.clamp(MediaTime::POSITIVE_INFINITY), secs(60.0));
    }

    #[test]
    fn test_intersection() {
        let a = TimeRange::new(secs(0.0), secs(50.0)).unwrap();
        let b = TimeRange::new(secs(40.0), secs(60.0)).unwrap();
        let c = TimeRange::new(secs(70.0), secs(80.0)).unwrap();

        assert_eq!(
            a.intersection(&b),
            Some(TimeRange::new(secs(40.0), secs(50.0)).unwrap())
        );
        assert_eq!(a.intersection(&c), None);
    }
}
