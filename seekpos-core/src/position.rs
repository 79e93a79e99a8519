//! Tolerance-bounded positions on a media timeline

use crate::MediaTime;

/// A time to reach, together with how far before and after it the reached
/// position may land
///
/// Small tolerances mean precision at the expense of efficiency (reaching a
/// position precisely may require more buffering). Large tolerances trade
/// precision for efficiency. A position carries no knowledge of segments:
/// keeping the reached time inside a segment is up to whoever performs the seek.
///
/// Construction never fails. An invalid or indefinite time becomes the
/// timeline origin, and a tolerance that is not a non-negative time or
/// `+inf` becomes zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "PositionRepr")
)]
pub struct Position {
    time: MediaTime,
    tolerance_before: MediaTime,
    tolerance_after: MediaTime,
}

impl Position {
    /// Creates a position for `time` with custom tolerances
    ///
    /// Use [`MediaTime::ZERO`] tolerances for precise positioning, or
    /// [`MediaTime::POSITIVE_INFINITY`] for efficient positioning.
    pub fn new(time: MediaTime, tolerance_before: MediaTime, tolerance_after: MediaTime) -> Self {
        Self {
            time: if time.is_valid() { time } else { MediaTime::ZERO },
            tolerance_before: normalize_tolerance(tolerance_before),
            tolerance_after: normalize_tolerance(tolerance_after),
        }
    }

    /// Exact position at `time`
    pub fn exact(time: MediaTime) -> Self {
        Self::new(time, MediaTime::ZERO, MediaTime::ZERO)
    }

    /// Position around `time`, with maximum tolerance on both sides
    pub fn near(time: MediaTime) -> Self {
        Self::new(time, MediaTime::POSITIVE_INFINITY, MediaTime::POSITIVE_INFINITY)
    }

    /// Position at or earlier than `time`
    pub fn before(time: MediaTime) -> Self {
        Self::new(time, MediaTime::POSITIVE_INFINITY, MediaTime::ZERO)
    }

    /// Position at or later than `time`
    pub fn after(time: MediaTime) -> Self {
        Self::new(time, MediaTime::ZERO, MediaTime::POSITIVE_INFINITY)
    }

    pub fn exact_seconds(seconds: f64) -> Self {
        Self::exact(MediaTime::from_seconds(seconds))
    }

    pub fn near_seconds(seconds: f64) -> Self {
        Self::near(MediaTime::from_seconds(seconds))
    }

    pub fn before_seconds(seconds: f64) -> Self {
        Self::before(MediaTime::from_seconds(seconds))
    }

    pub fn after_seconds(seconds: f64) -> Self {
        Self::after(MediaTime::from_seconds(seconds))
    }

    /// Builds a position from time codes
    ///
    /// Unparsable codes are handled like invalid times: the time falls back to
    /// the origin and tolerances to zero.
    pub fn from_timecodes(time: &str, tolerance_before: &str, tolerance_after: &str) -> Self {
        let parse = |code: &str| code.parse().unwrap_or(MediaTime::INVALID);
        Self::new(parse(time), parse(tolerance_before), parse(tolerance_after))
    }

    /// The time to reach. Always valid.
    pub fn time(&self) -> MediaTime {
        self.time
    }

    /// Accepted deviation before `time`. Zero, positive or `+inf`.
    pub fn tolerance_before(&self) -> MediaTime {
        self.tolerance_before
    }

    /// Accepted deviation after `time`. Zero, positive or `+inf`.
    pub fn tolerance_after(&self) -> MediaTime {
        self.tolerance_after
    }

    /// Checks if both tolerances are zero
    pub fn is_exact(&self) -> bool {
        self.tolerance_before == MediaTime::ZERO && self.tolerance_after == MediaTime::ZERO
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(MediaTime::ZERO, MediaTime::ZERO, MediaTime::ZERO)
    }
}

fn normalize_tolerance(tolerance: MediaTime) -> MediaTime {
    if tolerance.is_positive_infinity() || (tolerance.is_numeric() && tolerance >= MediaTime::ZERO) {
        tolerance
    } else {
        MediaTime::ZERO
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PositionRepr {
    #[serde(default, deserialize_with = "crate::time::serde_impl::deserialize_lenient")]
    time: MediaTime,
    #[serde(default, deserialize_with = "crate::time::serde_impl::deserialize_lenient")]
    tolerance_before: MediaTime,
    #[serde(default, deserialize_with = "crate::time::serde_impl::deserialize_lenient")]
    tolerance_after: MediaTime,
}

#[cfg(feature = "serde")]
impl From<PositionRepr> for Position {
    fn from(repr: PositionRepr) -> Self {
        Position::new(repr.time, repr.tolerance_before, repr.tolerance_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(seconds: f64) -> MediaTime {
        MediaTime::from_seconds(seconds)
    }

    #[test]
    fn test_custom_position_keeps_inputs() {
        let position = Position::new(secs(30.0), secs(2.0), secs(5.0));
        assert_eq!(position.time(), secs(30.0));
        assert_eq!(position.tolerance_before(), secs(2.0));
        assert_eq!(position.tolerance_after(), secs(5.0));
    }

    #[test]
    fn test_invalid_time_becomes_origin() {
        let position = Position::new(MediaTime::INVALID, secs(1.0), secs(1.0));
        assert_eq!(position.time(), MediaTime::ZERO);
        assert_eq!(position.tolerance_before(), secs(1.0));
        assert_eq!(position.tolerance_after(), secs(1.0));

        assert_eq!(Position::exact(MediaTime::INDEFINITE).time(), MediaTime::ZERO);
        assert_eq!(Position::exact_seconds(f64::NAN).time(), MediaTime::ZERO);
    }

    #[test]
    fn test_infinite_times_are_kept() {
        assert!(Position::exact(MediaTime::POSITIVE_INFINITY).time().is_positive_infinity());
        assert!(Position::exact(MediaTime::NEGATIVE_INFINITY).time().is_negative_infinity());
    }

    #[test]
    fn test_bad_tolerances_become_zero() {
        for tolerance in [
            MediaTime::INVALID,
            MediaTime::INDEFINITE,
            MediaTime::NEGATIVE_INFINITY,
            secs(-2.0),
        ] {
            let position = Position::new(secs(10.0), tolerance, tolerance);
            assert_eq!(position.tolerance_before(), MediaTime::ZERO);
            assert_eq!(position.tolerance_after(), MediaTime::ZERO);
        }
    }

    #[test]
    fn test_convenience_constructors() {
        let t = secs(12.0);
        let inf = MediaTime::POSITIVE_INFINITY;
        let zero = MediaTime::ZERO;

        assert_eq!(Position::default(), Position::new(zero, zero, zero));
        assert_eq!(Position::exact(t), Position::new(t, zero, zero));
        assert_eq!(Position::near(t), Position::new(t, inf, inf));
        assert_eq!(Position::before(t), Position::new(t, inf, zero));
        assert_eq!(Position::after(t), Position::new(t, zero, inf));
        assert_eq!(Position::after_seconds(12.0), Position::after(t));
    }

    #[test]
    fn test_is_exact() {
        assert!(Position::default().is_exact());
        assert!(!Position::before_seconds(3.0).is_exact());
    }

    #[test]
    fn test_from_timecodes() {
        let position = Position::from_timecodes("00:30", "2s", "inf");
        assert_eq!(position.time(), secs(30.0));
        assert_eq!(position.tolerance_before(), secs(2.0));
        assert!(position.tolerance_after().is_positive_infinity());

        let garbage = Position::from_timecodes("bogus", "-1", "??");
        assert_eq!(garbage, Position::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_normalizes() {
        let json = r#"{"time":"indefinite","tolerance_before":"-inf","tolerance_after":"+inf"}"#;
        let position: Position = serde_json::from_str(json).unwrap();
        assert_eq!(position, Position::after(MediaTime::ZERO));

        let partial: Position = serde_json::from_str(r#"{"time":"12s"}"#).unwrap();
        assert_eq!(partial, Position::exact(secs(12.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_never_fails_on_bad_times() {
        let bogus: Position = serde_json::from_str(r#"{"time":"bogus"}"#).unwrap();
        assert_eq!(bogus, Position::default());

        let json = r#"{"time":true,"tolerance_before":"soon","tolerance_after":[1]}"#;
        let odd: Position = serde_json::from_str(json).unwrap();
        assert_eq!(odd, Position::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_plain_seconds() {
        let position: Position = serde_json::from_str(r#"{"time":30,"tolerance_after":1.5}"#).unwrap();
        assert_eq!(position, Position::new(secs(30.0), MediaTime::ZERO, secs(1.5)));
    }
}
