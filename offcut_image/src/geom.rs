// Copyright 2026 the Offcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry for subset windows, plus the float rectangle used at
//! the canvas/shader boundary.

/// An integer point, typically the top-left corner of a subset window.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IPoint {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl IPoint {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An integer size in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ISize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl ISize {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true if either extent is zero or negative.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Total number of pixels, zero for empty sizes.
    #[inline]
    pub const fn area(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }
}

/// An axis-aligned integer rectangle in pixel coordinates.
///
/// `x0`/`y0` are inclusive, `x1`/`y1` are exclusive. Subset windows are
/// expressed as `IRect`s in their backing store's coordinate frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Minimum X coordinate.
    pub x0: i32,
    /// Minimum Y coordinate.
    pub y0: i32,
    /// Maximum X coordinate (exclusive).
    pub x1: i32,
    /// Maximum Y coordinate (exclusive).
    pub y1: i32,
}

impl IRect {
    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from its top-left corner and extents.
    #[inline]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Create a rectangle at the origin covering `size`.
    #[inline]
    pub const fn from_size(size: ISize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Width of the rectangle.
    #[inline]
    pub const fn width(self) -> i32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    #[inline]
    pub const fn height(self) -> i32 {
        self.y1 - self.y0
    }

    /// Extents of the rectangle.
    #[inline]
    pub const fn size(self) -> ISize {
        ISize::new(self.width(), self.height())
    }

    /// Top-left corner.
    #[inline]
    pub const fn top_left(self) -> IPoint {
        IPoint::new(self.x0, self.y0)
    }

    /// Returns true if the rectangle encloses no pixels.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Returns true if both extents are non-negative.
    #[inline]
    pub const fn is_sorted(self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    /// Returns true if `other` lies entirely within `self`.
    #[inline]
    pub const fn contains_rect(self, other: Self) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    /// Returns true if the two rectangles share at least one pixel.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Translate the rectangle by the given point.
    #[inline]
    pub const fn offset_by(self, delta: IPoint) -> Self {
        Self::new(
            self.x0 + delta.x,
            self.y0 + delta.y,
            self.x1 + delta.x,
            self.y1 + delta.y,
        )
    }

    /// Convert to the float rectangle used at the canvas/shader boundary.
    #[inline]
    pub fn to_rectf(self) -> RectF {
        RectF::new(self.x0 as f32, self.y0 as f32, self.x1 as f32, self.y1 as f32)
    }
}

/// A simple axis-aligned rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RectF {
    /// Minimum X coordinate.
    pub x0: f32,
    /// Minimum Y coordinate.
    pub y0: f32,
    /// Maximum X coordinate.
    pub x1: f32,
    /// Maximum Y coordinate.
    pub y1: f32,
}

impl RectF {
    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from its top-left corner and extents.
    #[inline]
    pub const fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the rectangle.
    #[inline]
    pub const fn width(self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    #[inline]
    pub const fn height(self) -> f32 {
        self.y1 - self.y0
    }

    /// Convert to kurbo's rectangle type.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

impl From<IRect> for RectF {
    #[inline]
    fn from(r: IRect) -> Self {
        r.to_rectf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_translates_all_corners() {
        let r = IRect::from_origin_size(10, 10, 50, 50);
        let shifted = r.offset_by(IPoint::new(-3, 7));
        assert_eq!(shifted, IRect::new(7, 17, 57, 67));
        assert_eq!(shifted.size(), r.size());
    }

    #[test]
    fn containment_and_intersection() {
        let outer = IRect::new(0, 0, 200, 200);
        let inner = IRect::from_origin_size(10, 10, 50, 50);
        assert!(outer.contains_rect(inner));
        assert!(outer.intersects(inner));
        assert!(!inner.contains_rect(outer));

        let outside = IRect::from_origin_size(200, 0, 10, 10);
        assert!(!outer.intersects(outside), "touching edges do not overlap");
    }

    #[test]
    fn empty_rects() {
        assert!(IRect::new(5, 5, 5, 9).is_empty());
        assert!(IRect::new(5, 5, 5, 9).is_sorted());
        assert!(!IRect::new(5, 5, 4, 9).is_sorted());
        assert!(ISize::new(0, 10).is_empty());
        assert_eq!(ISize::new(-1, 10).area(), 0);
    }

    #[test]
    fn rectf_conversion() {
        let r = IRect::from_origin_size(10, 10, 50, 50);
        let f = r.to_rectf();
        assert_eq!(f, RectF::new(10.0, 10.0, 60.0, 60.0));
        assert_eq!(f.to_kurbo(), kurbo::Rect::new(10.0, 10.0, 60.0, 60.0));
    }
}
