//! Rational time values on a media timeline

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};

/// Timescale used for times built from floating-point seconds (nanoseconds)
pub const DEFAULT_TIMESCALE: i32 = 1_000_000_000;

/// State of a media time. The declaration order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Kind {
    NegativeInfinity,
    Numeric,
    PositiveInfinity,
    Indefinite,
    Invalid,
}

/// A point or a duration on a media timeline, expressed as `value / timescale` seconds
///
/// Besides numeric values, a time can be invalid, indefinite (unknown, e.g. the
/// duration of a live stream) or infinite in either direction. Times are totally
/// ordered as `-inf < numeric < +inf < indefinite < invalid`, and numeric times
/// compare by their exact rational value, so `1/1 == 10/10`.
#[derive(Debug, Clone, Copy)]
pub struct MediaTime {
    value: i64,
    timescale: i32,
    kind: Kind,
}

impl MediaTime {
    /// The timeline origin
    pub const ZERO: MediaTime = MediaTime::numeric(0, 1);
    pub const INVALID: MediaTime = MediaTime::special(Kind::Invalid);
    pub const INDEFINITE: MediaTime = MediaTime::special(Kind::Indefinite);
    pub const POSITIVE_INFINITY: MediaTime = MediaTime::special(Kind::PositiveInfinity);
    pub const NEGATIVE_INFINITY: MediaTime = MediaTime::special(Kind::NegativeInfinity);

    const fn numeric(value: i64, timescale: i32) -> Self {
        Self {
            value,
            timescale,
            kind: Kind::Numeric,
        }
    }

    const fn special(kind: Kind) -> Self {
        Self {
            value: 0,
            timescale: 0,
            kind,
        }
    }

    /// Creates a numeric time of `value / timescale` seconds
    ///
    /// A timescale that is not strictly positive yields [`MediaTime::INVALID`].
    pub const fn new(value: i64, timescale: i32) -> Self {
        if timescale > 0 {
            Self::numeric(value, timescale)
        } else {
            Self::INVALID
        }
    }

    /// Creates a time from seconds at nanosecond resolution
    pub fn from_seconds(seconds: f64) -> Self {
        Self::from_seconds_with_timescale(seconds, DEFAULT_TIMESCALE)
    }

    /// Creates a time from seconds at the given timescale
    ///
    /// NaN is invalid, infinite inputs map to the matching infinity and values
    /// too large for the timescale saturate to the matching infinity.
    pub fn from_seconds_with_timescale(seconds: f64, timescale: i32) -> Self {
        if seconds.is_nan() || timescale <= 0 {
            return Self::INVALID;
        }

        let scaled = (seconds * timescale as f64).round();
        if scaled >= i64::MAX as f64 {
            Self::POSITIVE_INFINITY
        } else if scaled < i64::MIN as f64 {
            Self::NEGATIVE_INFINITY
        } else {
            Self::numeric(scaled as i64, timescale)
        }
    }

    /// Creates a time from milliseconds
    pub const fn from_millis(millis: i64) -> Self {
        Self::numeric(millis, 1000)
    }

    /// Raw value (0 for non-numeric times)
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Raw timescale (0 for non-numeric times)
    pub fn timescale(&self) -> i32 {
        self.timescale
    }

    /// True for numeric and infinite times, false for invalid and indefinite ones
    pub fn is_valid(&self) -> bool {
        matches!(
            self.kind,
            Kind::Numeric | Kind::PositiveInfinity | Kind::NegativeInfinity
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == Kind::Numeric
    }

    pub fn is_indefinite(&self) -> bool {
        self.kind == Kind::Indefinite
    }

    pub fn is_infinite(&self) -> bool {
        self.is_positive_infinity() || self.is_negative_infinity()
    }

    pub fn is_positive_infinity(&self) -> bool {
        self.kind == Kind::PositiveInfinity
    }

    pub fn is_negative_infinity(&self) -> bool {
        self.kind == Kind::NegativeInfinity
    }

    /// Returns the time in seconds (NaN for invalid and indefinite times)
    pub fn seconds(&self) -> f64 {
        match self.kind {
            Kind::Numeric => self.value as f64 / self.timescale as f64,
            Kind::PositiveInfinity => f64::INFINITY,
            Kind::NegativeInfinity => f64::NEG_INFINITY,
            Kind::Indefinite | Kind::Invalid => f64::NAN,
        }
    }

    /// Expresses a numeric time in another timescale, rounding half away from zero
    ///
    /// Non-numeric times are returned unchanged.
    pub fn convert_scale(&self, timescale: i32) -> Self {
        if !self.is_numeric() {
            return *self;
        }
        if timescale <= 0 {
            return Self::INVALID;
        }
        if timescale == self.timescale {
            return *self;
        }

        let scaled = rescale(
            self.value as i128,
            timescale as i128,
            self.timescale as i128,
        );
        Self::saturating_numeric(scaled, timescale)
    }

    fn saturating_numeric(value: i128, timescale: i32) -> Self {
        match i64::try_from(value) {
            Ok(value) => Self::numeric(value, timescale),
            Err(_) if value > 0 => Self::POSITIVE_INFINITY,
            Err(_) => Self::NEGATIVE_INFINITY,
        }
    }
}

/// Computes `value * num / den` rounded half away from zero (`den > 0`)
fn rescale(value: i128, num: i128, den: i128) -> i128 {
    let product = value * num;
    let quotient = product / den;
    let remainder = product % den;
    if remainder.abs() * 2 >= den {
        quotient + product.signum()
    } else {
        quotient
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.abs()
}

/// Timescale two numeric times are combined on: their LCM if it fits, else the larger one
fn common_timescale(a: i32, b: i32) -> i32 {
    if a == b {
        return a;
    }
    let lcm = (a as i64 / gcd(a as i64, b as i64)) * b as i64;
    i32::try_from(lcm).unwrap_or(a.max(b))
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Ord for MediaTime {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.kind, other.kind) {
            (Kind::Numeric, Kind::Numeric) => {
                let lhs = self.value as i128 * other.timescale as i128;
                let rhs = other.value as i128 * self.timescale as i128;
                lhs.cmp(&rhs)
            }
            (lhs, rhs) => lhs.cmp(&rhs),
        }
    }
}

impl PartialOrd for MediaTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MediaTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MediaTime {}

impl Hash for MediaTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        if self.is_numeric() {
            // Reduced fraction, so that equal times hash equally
            let divisor = gcd(self.value, self.timescale as i64).max(1);
            (self.value / divisor).hash(state);
            (self.timescale as i64 / divisor).hash(state);
        }
    }
}

impl Add for MediaTime {
    type Output = MediaTime;

    fn add(self, rhs: MediaTime) -> MediaTime {
        match (self.kind, rhs.kind) {
            (Kind::Invalid, _) | (_, Kind::Invalid) => MediaTime::INVALID,
            (Kind::Indefinite, _) | (_, Kind::Indefinite) => MediaTime::INDEFINITE,
            (Kind::PositiveInfinity, Kind::NegativeInfinity)
            | (Kind::NegativeInfinity, Kind::PositiveInfinity) => MediaTime::INVALID,
            (Kind::PositiveInfinity, _) | (_, Kind::PositiveInfinity) => {
                MediaTime::POSITIVE_INFINITY
            }
            (Kind::NegativeInfinity, _) | (_, Kind::NegativeInfinity) => {
                MediaTime::NEGATIVE_INFINITY
            }
            (Kind::Numeric, Kind::Numeric) => {
                let timescale = common_timescale(self.timescale, rhs.timescale);
                let lhs = self.convert_scale(timescale);
                let rhs = rhs.convert_scale(timescale);
                if !(lhs.is_numeric() && rhs.is_numeric()) {
                    // Rescaling overflowed into an infinity
                    return lhs + rhs;
                }
                MediaTime::saturating_numeric(lhs.value as i128 + rhs.value as i128, timescale)
            }
        }
    }
}

impl Neg for MediaTime {
    type Output = MediaTime;

    fn neg(self) -> MediaTime {
        match self.kind {
            Kind::Numeric => MediaTime::saturating_numeric(-(self.value as i128), self.timescale),
            Kind::PositiveInfinity => MediaTime::NEGATIVE_INFINITY,
            Kind::NegativeInfinity => MediaTime::POSITIVE_INFINITY,
            Kind::Indefinite | Kind::Invalid => self,
        }
    }
}

impl Sub for MediaTime {
    type Output = MediaTime;

    fn sub(self, rhs: MediaTime) -> MediaTime {
        self + -rhs
    }
}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Numeric => write!(f, "{}s", self.seconds()),
            Kind::PositiveInfinity => f.write_str("+inf"),
            Kind::NegativeInfinity => f.write_str("-inf"),
            Kind::Indefinite => f.write_str("indefinite"),
            Kind::Invalid => f.write_str("invalid"),
        }
    }
}

#[cfg(feature = "serde")]
pub(crate) mod serde_impl {
    use super::MediaTime;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Numeric times keep their exact rational form, special states are written as text.
    /// Plain numbers are read as seconds.
    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Rational { value: i64, timescale: i32 },
        Seconds(f64),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LenientRepr {
        Known(Repr),
        Unknown(IgnoredAny),
    }

    impl Repr {
        fn into_time(self) -> crate::Result<MediaTime> {
            match self {
                Repr::Rational { value, timescale } => Ok(MediaTime::new(value, timescale)),
                Repr::Seconds(seconds) => Ok(MediaTime::from_seconds(seconds)),
                Repr::Text(text) if text == "invalid" => Ok(MediaTime::INVALID),
                Repr::Text(text) => text.parse(),
            }
        }
    }

    impl Serialize for MediaTime {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let repr = if self.is_numeric() {
                Repr::Rational {
                    value: self.value,
                    timescale: self.timescale,
                }
            } else {
                Repr::Text(self.to_string())
            };
            repr.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for MediaTime {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Repr::deserialize(deserializer)?
                .into_time()
                .map_err(serde::de::Error::custom)
        }
    }

    /// Reads any value, mapping what is not a time to [`MediaTime::INVALID`]
    pub(crate) fn deserialize_lenient<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<MediaTime, D::Error> {
        Ok(match LenientRepr::deserialize(deserializer)? {
            LenientRepr::Known(repr) => repr.into_time().unwrap_or(MediaTime::INVALID),
            LenientRepr::Unknown(_) => MediaTime::INVALID,
        })
    }
}
