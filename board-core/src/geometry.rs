//! Integer geometry primitives.
//!
//! Element geometry is kept in whole device-independent pixels. Every
//! constructor that accepts fractional input rounds it, so positions and
//! sizes never drift by sub-pixel amounts across repeated drags.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Round a float to the nearest integer pixel.
///
/// Non-finite input collapses to zero; out-of-range input saturates.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_px(value: f64) -> i32 {
    if value.is_finite() {
        value.round() as i32
    } else {
        0
    }
}

/// Element position on the canvas: `x`, `y` plus stacking order `z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPosition")]
pub struct Position3 {
    /// Pixels from the canvas' left edge.
    pub x: i32,
    /// Pixels from the canvas' top edge.
    pub y: i32,
    /// Stacking order; higher values draw on top.
    pub z: i32,
}

impl Position3 {
    /// Create a position from integer components.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Create a position from fractional components, rounding each.
    #[must_use]
    pub fn rounded(x: f64, y: f64, z: f64) -> Self {
        Self::new(round_px(x), round_px(y), round_px(z))
    }

    /// The origin at stacking order zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Same stacking order, different planar coordinates.
    #[must_use]
    pub const fn with_xy(self, x: i32, y: i32) -> Self {
        Self { x, y, z: self.z }
    }
}

impl Add for Position3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x.saturating_add(rhs.x),
            self.y.saturating_add(rhs.y),
            self.z.saturating_add(rhs.z),
        )
    }
}

#[derive(Deserialize)]
struct RawPosition {
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
}

impl From<RawPosition> for Position3 {
    fn from(raw: RawPosition) -> Self {
        Self::rounded(raw.x, raw.y, raw.z)
    }
}

/// Element size: `x` is the width and `y` the height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSize")]
pub struct Size2 {
    /// Width in pixels.
    pub x: i32,
    /// Height in pixels.
    pub y: i32,
}

impl Size2 {
    /// Create a size from integer components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Create a size from fractional components, rounding each.
    #[must_use]
    pub fn rounded(x: f64, y: f64) -> Self {
        Self::new(round_px(x), round_px(y))
    }

    /// The empty size.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }
}

impl Add for Size2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

#[derive(Deserialize)]
struct RawSize {
    x: f64,
    y: f64,
}

impl From<RawSize> for Size2 {
    fn from(raw: RawSize) -> Self {
        Self::rounded(raw.x, raw.y)
    }
}

/// A pointer location. Kept fractional because hosts report sub-pixel
/// pointer coordinates; it is rounded only when written into geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`.
    #[must_use]
    pub fn offset_from(self, origin: Self) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned integer rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The bounding box of an element at `position` with `size`.
    #[must_use]
    pub const fn from_parts(position: Position3, size: Size2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Whether the point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= f64::from(self.x)
            && point.x <= f64::from(self.right())
            && point.y >= f64::from(self.y)
            && point.y <= f64::from(self.bottom())
    }

    /// Whether the two rectangles share interior area.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_on_construction() {
        assert_eq!(Size2::rounded(259.6, 160.4), Size2::new(260, 160));
        assert_eq!(Position3::rounded(10.5, -3.2, 1.0), Position3::new(11, -3, 1));
        assert_eq!(Size2::rounded(f64::NAN, f64::INFINITY), Size2::zero());
    }

    #[test]
    fn test_component_wise_add() {
        let moved = Position3::new(10, 20, 3) + Position3::new(5, -5, 1);
        assert_eq!(moved, Position3::new(15, 15, 4));
        assert_eq!(Size2::new(100, 50) + Size2::new(-10, 10), Size2::new(90, 60));
    }

    #[test]
    fn test_deserialize_rounds_fractional_json() {
        let pos: Position3 = serde_json::from_str(r#"{"x": 12.6, "y": 4.4}"#).expect("parse");
        assert_eq!(pos, Position3::new(13, 4, 0));

        let size: Size2 = serde_json::from_str(r#"{"x": 260, "y": 160}"#).expect("parse");
        assert_eq!(size, Size2::new(260, 160));
    }

    #[test]
    fn test_rect_contains_and_center() {
        let rect = Rect::new(100, 100, 200, 50);
        assert!(rect.contains(Point::new(150.0, 125.0)));
        assert!(rect.contains(Point::new(300.0, 150.0)));
        assert!(!rect.contains(Point::new(50.0, 50.0)));
        assert_eq!(rect.center(), Point::new(200.0, 125.0));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 100, 100);
        assert!(a.intersects(&Rect::new(50, 50, 100, 100)));
        assert!(!a.intersects(&Rect::new(100, 0, 10, 10)));
    }
}
