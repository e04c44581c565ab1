// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangles in tile space.
//!
//! Both types use tile units, not pixels. Converting to pixel or texture
//! coordinates is left to the atlas manager, which knows its tile size.

/// An axis-aligned rectangle of tiles.
///
/// `x` and `y` are the top-left tile, `width` and `height` are tile counts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileRect {
    /// Column of the leftmost tile.
    pub x: u32,
    /// Row of the topmost tile.
    pub y: u32,
    /// Number of tile columns.
    pub width: u32,
    /// Number of tile rows.
    pub height: u32,
}

impl TileRect {
    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The column just past the right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// The row just past the bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of tiles covered.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Whether the rectangle covers no tiles.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the tile at `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the two rectangles share at least one tile.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A query region with inclusive tile bounds.
///
/// A region always covers at least one tile when `left <= right` and
/// `top <= bottom`; [`TileGrid::find_free_regions`] rejects regions that
/// don't.
///
/// [`TileGrid::find_free_regions`]: crate::TileGrid::find_free_regions
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileRegion {
    /// Leftmost column, inclusive.
    pub left: u32,
    /// Topmost row, inclusive.
    pub top: u32,
    /// Rightmost column, inclusive.
    pub right: u32,
    /// Bottommost row, inclusive.
    pub bottom: u32,
}

impl TileRegion {
    /// Create a new region from inclusive bounds.
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether the bounds are in order on both axes.
    pub fn is_ordered(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    /// Number of columns covered. Only meaningful for ordered regions.
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Number of rows covered. Only meaningful for ordered regions.
    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Number of tiles covered. Only meaningful for ordered regions.
    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }
}

impl From<TileRect> for TileRegion {
    /// Convert a non-empty rectangle into the region covering the same tiles.
    fn from(rect: TileRect) -> Self {
        debug_assert!(!rect.is_empty(), "cannot convert an empty rect to a region");
        Self {
            left: rect.x,
            top: rect.y,
            right: rect.right() - 1,
            bottom: rect.bottom() - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_are_exclusive() {
        let rect = TileRect::new(2, 3, 4, 5);
        assert_eq!(rect.right(), 6);
        assert_eq!(rect.bottom(), 8);
        assert_eq!(rect.area(), 20);
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 7));
        assert!(!rect.contains(5, 8));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = TileRect::new(0, 0, 2, 2);
        let b = TileRect::new(2, 0, 2, 2);
        let c = TileRect::new(1, 1, 2, 2);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(b.intersects(&c));
    }

    #[test]
    fn empty_rect_intersects_nothing() {
        let empty = TileRect::new(1, 1, 0, 3);
        assert!(empty.is_empty());
        assert!(!empty.intersects(&TileRect::new(0, 0, 4, 4)));
    }

    #[test]
    fn region_from_rect_is_inclusive() {
        let region = TileRegion::from(TileRect::new(1, 2, 3, 1));
        assert_eq!(region, TileRegion::new(1, 2, 3, 2));
        assert_eq!(region.area(), 3);
    }
}
