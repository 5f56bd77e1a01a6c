//! Strongly-typed numeric primitives for diagram geometry (zero-cost newtypes).
//!
//! All canvas coordinates are in points with the y axis pointing up, so a
//! node's TOP face has the larger y value.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use glam::{DVec2, dvec2};
use serde::{Deserialize, Serialize};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
    /// Value exceeds the largest supported count
    TooLarge,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
            NumericError::TooLarge => write!(f, "value is too large"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Length in points (1/72 inch)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Length(pub f64);

impl Length {
    pub const ZERO: Length = Length(0.0);

    /// Create a Length with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Length, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else {
            Ok(Length(val))
        }
    }

    /// Create a non-negative Length with validation
    #[inline]
    pub fn try_non_negative(val: f64) -> Result<Length, NumericError> {
        let len = Length::try_new(val)?;
        if len.0 < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(len)
        }
    }

    #[inline]
    pub fn min(self, other: Length) -> Length {
        Length(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Length) -> Length {
        Length(self.0.max(other.0))
    }

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length { Length(self.0 + rhs.0) }
}
impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length { Length(self.0 - rhs.0) }
}
impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, rhs: f64) -> Length { Length(self.0 * rhs) }
}
impl Div<f64> for Length {
    type Output = Length;
    fn div(self, rhs: f64) -> Length { Length(self.0 / rhs) }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rotation angle in degrees, counter-clockwise from the +x axis
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Angle(pub f64);

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self { Point { x, y } }
}

impl Point<Length> {
    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.x.0, self.y.0)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Point { x: Length(v.x), y: Length(v.y) }
    }
}

impl fmt::Display for Point<Length> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size<T> {
    pub height: T,
    pub width: T,
}

impl<T> Size<T> {
    pub fn new(height: T, width: T) -> Self { Size { height, width } }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl BBox<Length> {
    /// Box spanning `size` up and to the right of the lower-left corner
    pub fn from_corner(lower_left: Point<Length>, size: Size<Length>) -> Self {
        BBox {
            min: lower_left,
            max: Point {
                x: lower_left.x + size.width,
                y: lower_left.y + size.height,
            },
        }
    }

    pub fn width(&self) -> Length { self.max.x - self.min.x }

    pub fn height(&self) -> Length { self.max.y - self.min.y }

    pub fn center(&self) -> Point<Length> {
        Point {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        }
    }

    /// True when `other` lies entirely within this box (edges inclusive)
    pub fn contains_box(&self, other: &BBox<Length>) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

/// A displacement/offset vector (not an absolute position)
/// Use this for translations; Point + Offset = Point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset<T> {
    pub dx: T,
    pub dy: T,
}

/// A unit direction along one of the four canvas axes (y up)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct UnitVec {
    dx: f64,
    dy: f64,
}

impl UnitVec {
    pub const UP: UnitVec = UnitVec { dx: 0.0, dy: 1.0 };
    pub const DOWN: UnitVec = UnitVec { dx: 0.0, dy: -1.0 };
    pub const RIGHT: UnitVec = UnitVec { dx: 1.0, dy: 0.0 };
    pub const LEFT: UnitVec = UnitVec { dx: -1.0, dy: 0.0 };

    pub fn dx(self) -> f64 { self.dx }

    pub fn dy(self) -> f64 { self.dy }

    pub fn is_horizontal(self) -> bool {
        self.dy == 0.0 && self.dx != 0.0
    }
}

/// Multiply a unit vector by a length to get an offset (not a point!)
impl Mul<Length> for UnitVec {
    type Output = Offset<Length>;
    fn mul(self, len: Length) -> Offset<Length> {
        Offset {
            dx: Length(self.dx * len.0),
            dy: Length(self.dy * len.0),
        }
    }
}

/// Add an offset to a point to get a new point
impl Add<Offset<Length>> for Point<Length> {
    type Output = Point<Length>;
    fn add(self, rhs: Offset<Length>) -> Point<Length> {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

/// Subtract two points to get an offset
impl Sub<Point<Length>> for Point<Length> {
    type Output = Offset<Length>;
    fn sub(self, rhs: Point<Length>) -> Offset<Length> {
        Offset {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

/// Canvas position in points
pub type Position = Point<Length>;
/// Rectangle size in points
pub type RectSize = Size<Length>;

/// Shorthand for building a position from raw point values
pub fn pos(x: f64, y: f64) -> Position {
    Point::new(Length(x), Length(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_try_new_rejects_nan_and_infinity() {
        assert_eq!(Length::try_new(f64::NAN), Err(NumericError::NaN));
        assert_eq!(Length::try_new(f64::INFINITY), Err(NumericError::Infinite));
        assert!(Length::try_new(-3.0).is_ok());
    }

    #[test]
    fn length_try_non_negative_rejects_negative() {
        assert_eq!(Length::try_non_negative(-1.0), Err(NumericError::Negative));
        assert_eq!(Length::try_non_negative(0.0), Ok(Length::ZERO));
    }

    #[test]
    fn length_arithmetic() {
        let a = Length(3.0);
        let b = Length(2.0);
        assert_eq!(a + b, Length(5.0));
        assert_eq!(a - b, Length(1.0));
        assert_eq!(a * 2.0, Length(6.0));
        assert_eq!(a / 2.0, Length(1.5));
        assert_eq!(a.min(b), b);
        assert_eq!(a.max(b), a);
    }

    #[test]
    fn unitvec_mul_length_gives_offset() {
        let offset = UnitVec::LEFT * Length(5.0);
        assert_eq!(offset.dx, Length(-5.0));
        assert_eq!(offset.dy, Length(0.0));
        assert!(UnitVec::LEFT.is_horizontal());
        assert!(!UnitVec::UP.is_horizontal());
    }

    #[test]
    fn point_plus_offset_and_difference() {
        let p = pos(1.0, 2.0);
        let moved = p + Offset { dx: Length(3.0), dy: Length(4.0) };
        assert_eq!(moved, pos(4.0, 6.0));
        let diff = moved - p;
        assert_eq!(diff.dx, Length(3.0));
        assert_eq!(diff.dy, Length(4.0));
    }

    #[test]
    fn point_dvec_roundtrip() {
        let p = pos(2.0, 3.5);
        assert_eq!(p.to_dvec2(), dvec2(2.0, 3.5));
        assert_eq!(Position::from_dvec2(p.to_dvec2()), p);
    }

    #[test]
    fn bbox_contains_box_is_edge_inclusive() {
        let outer = BBox::from_corner(pos(0.0, 0.0), Size::new(Length(100.0), Length(200.0)));
        let inner = BBox::from_corner(pos(150.0, 80.0), Size::new(Length(20.0), Length(50.0)));
        assert!(outer.contains_box(&inner));
        let spill = BBox::from_corner(pos(151.0, 80.0), Size::new(Length(20.0), Length(50.0)));
        assert!(!outer.contains_box(&spill));
        assert_eq!(outer.width(), Length(200.0));
        assert_eq!(outer.height(), Length(100.0));
        assert_eq!(outer.center(), pos(100.0, 50.0));
    }
}
