use crate::foundation::error::{MontageError, MontageResult};
use crate::foundation::math::{clamp_i64, div_ceil_i128, div_floor_i128, gcd_u64};
use std::fmt;
use std::str::FromStr;

pub use kurbo::{Point, Vec2};

const NANOS_PER_SEC: i128 = 1_000_000_000;

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
struct RationalRepr {
    num: i32,
    den: u32,
}

/// Signed rational number `num/den`, always stored reduced with `den > 0`.
///
/// Used for playback speeds: zero is stopped, negative plays backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RationalRepr", into = "RationalRepr")]
pub struct Rational {
    num: i32,
    den: u32,
}

impl Rational {
    /// `0/1`.
    pub const ZERO: Self = Self { num: 0, den: 1 };
    /// `1/1`.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Create a validated, reduced rational.
    pub fn new(num: i32, den: u32) -> MontageResult<Self> {
        if den == 0 {
            return Err(MontageError::validation("Rational den must be > 0"));
        }
        let g = gcd_u64(u64::from(num.unsigned_abs()), u64::from(den)).max(1);
        Ok(Self {
            num: (i64::from(num) / g as i64) as i32,
            den: (u64::from(den) / g) as u32,
        })
    }

    /// Whole-number rational `n/1`.
    pub const fn integer(n: i32) -> Self {
        Self { num: n, den: 1 }
    }

    /// Numerator (carries the sign).
    pub fn num(self) -> i32 {
        self.num
    }

    /// Denominator, always positive.
    pub fn den(self) -> u32 {
        self.den
    }

    /// Convert to floating point.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Return `true` for `0/1`.
    pub fn is_zero(self) -> bool {
        self.num == 0
    }

    /// `-1`, `0` or `1`.
    pub fn signum(self) -> i64 {
        i64::from(self.num.signum())
    }
}

impl TryFrom<RationalRepr> for Rational {
    type Error = MontageError;

    fn try_from(r: RationalRepr) -> Result<Self, Self::Error> {
        Self::new(r.num, r.den)
    }
}

impl From<Rational> for RationalRepr {
    fn from(r: Rational) -> Self {
        Self {
            num: r.num,
            den: r.den,
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for Rational {
    type Err = MontageError;

    /// Parse `"n"` or `"n/d"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (n, d) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num = n
            .parse::<i32>()
            .map_err(|e| MontageError::validation(format!("invalid rational '{s}': {e}")))?;
        let den = d
            .parse::<u32>()
            .map_err(|e| MontageError::validation(format!("invalid rational '{s}': {e}")))?;
        Self::new(num, den)
    }
}

/// Strictly positive rate (frames or samples per second) with exact time conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RationalRepr", into = "RationalRepr")]
pub struct FrameRate(Rational);

impl FrameRate {
    /// Create a validated rate `num/den` (both must be > 0).
    pub fn new(num: u32, den: u32) -> MontageResult<Self> {
        if num == 0 {
            return Err(MontageError::validation("FrameRate num must be > 0"));
        }
        let num = i32::try_from(num)
            .map_err(|_| MontageError::validation("FrameRate num exceeds i32"))?;
        Ok(Self(Rational::new(num, den)?))
    }

    /// Integer rate, e.g. an audio sample rate in Hz.
    pub fn from_hz(hz: u32) -> MontageResult<Self> {
        Self::new(hz, 1)
    }

    /// The underlying rational.
    pub fn as_rational(self) -> Rational {
        self.0
    }

    /// Convert to floating point.
    pub fn as_f64(self) -> f64 {
        self.0.as_f64()
    }

    /// Presentation time (ns) at which `frame` starts: `ceil(frame * 1e9 * den / num)`.
    pub fn time_of_frame(self, frame: i64) -> i64 {
        let num = i128::from(frame) * NANOS_PER_SEC * i128::from(self.0.den);
        clamp_i64(div_ceil_i128(num, i128::from(self.0.num)))
    }

    /// Frame showing at presentation time `time` (ns): `floor(time * num / (1e9 * den))`.
    ///
    /// Inverse of [`FrameRate::time_of_frame`] for every frame index.
    pub fn frame_at_time(self, time: i64) -> i64 {
        let num = i128::from(time) * i128::from(self.0.num);
        clamp_i64(div_floor_i128(num, NANOS_PER_SEC * i128::from(self.0.den)))
    }
}

impl TryFrom<RationalRepr> for FrameRate {
    type Error = MontageError;

    fn try_from(r: RationalRepr) -> Result<Self, Self::Error> {
        if r.num <= 0 {
            return Err(MontageError::validation("FrameRate num must be > 0"));
        }
        Self::new(r.num as u32, r.den)
    }
}

impl From<FrameRate> for RationalRepr {
    fn from(r: FrameRate) -> Self {
        r.0.into()
    }
}

/// Integer 2D point.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct V2i {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl V2i {
    /// Construct a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer pixel box with INCLUSIVE `max`.
///
/// A box is empty when `max.x < min.x` or `max.y < min.y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Box2i {
    /// Inclusive top-left corner.
    pub min: V2i,
    /// Inclusive bottom-right corner.
    pub max: V2i,
}

impl Box2i {
    /// Box spanning `min_x..=max_x`, `min_y..=max_y`.
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min: V2i::new(min_x, min_y),
            max: V2i::new(max_x, max_y),
        }
    }

    /// Box with its top-left corner at `(x, y)` and the given size.
    pub fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::empty();
        }
        let max_x = i64::from(x) + i64::from(width) - 1;
        let max_y = i64::from(y) + i64::from(height) - 1;
        Self::new(
            x,
            y,
            max_x.min(i64::from(i32::MAX)) as i32,
            max_y.min(i64::from(i32::MAX)) as i32,
        )
    }

    /// Canonical empty box.
    pub const fn empty() -> Self {
        Self::new(0, 0, -1, -1)
    }

    /// Return `true` when the box contains no pixels.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    /// Width in pixels (0 when empty).
    pub fn width(&self) -> u32 {
        if self.is_empty() {
            return 0;
        }
        (i64::from(self.max.x) - i64::from(self.min.x) + 1) as u32
    }

    /// Height in pixels (0 when empty).
    pub fn height(&self) -> u32 {
        if self.is_empty() {
            return 0;
        }
        (i64::from(self.max.y) - i64::from(self.min.y) + 1) as u32
    }

    /// Number of pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Return `true` when pixel `(x, y)` lies inside the box.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.min.x <= x && x <= self.max.x && self.min.y <= y && y <= self.max.y
    }

    /// Return `true` when `other` lies entirely inside this box. Empty boxes are always contained.
    pub fn contains_box(&self, other: &Box2i) -> bool {
        if other.is_empty() {
            return true;
        }
        !self.is_empty()
            && self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Intersection; returns [`Box2i::empty`] when the boxes do not overlap.
    pub fn intersect(&self, other: &Box2i) -> Box2i {
        let b = Box2i::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        );
        if b.is_empty() { Box2i::empty() } else { b }
    }

    /// Smallest box containing both inputs; empty inputs are ignored.
    pub fn union(&self, other: &Box2i) -> Box2i {
        if self.is_empty() {
            return if other.is_empty() {
                Box2i::empty()
            } else {
                *other
            };
        }
        if other.is_empty() {
            return *self;
        }
        Box2i::new(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
        )
    }

    /// Move the box by `(dx, dy)`. Empty boxes stay canonical-empty.
    pub fn translate(&self, dx: i32, dy: i32) -> Box2i {
        if self.is_empty() {
            return Box2i::empty();
        }
        Box2i::new(
            self.min.x.saturating_add(dx),
            self.min.y.saturating_add(dy),
            self.max.x.saturating_add(dx),
            self.max.y.saturating_add(dy),
        )
    }
}

impl Default for Box2i {
    fn default() -> Self {
        Self::empty()
    }
}

/// Premultiplied-alpha linear RGBA color with `f32` channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red channel premultiplied by alpha.
    pub r: f32,
    /// Green channel premultiplied by alpha.
    pub g: f32,
    /// Blue channel premultiplied by alpha.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Construct from already-premultiplied channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiply straight-alpha channels.
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(r * a, g * a, b * a, a)
    }

    /// Undo premultiplication; transparent pixels map to transparent black.
    pub fn to_straight(self) -> [f32; 4] {
        if self.a <= 0.0 {
            return [0.0; 4];
        }
        [self.r / self.a, self.g / self.a, self.b / self.a, self.a]
    }

    /// Multiply every channel by `k`.
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }
}

impl std::ops::Add for Rgba {
    type Output = Rgba;

    fn add(self, o: Self) -> Self {
        Self::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
