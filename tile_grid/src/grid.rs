// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tile grid: occupancy tracking for one atlas page.

use alloc::vec;
use alloc::vec::Vec;
use log::{debug, trace, warn};
use thiserror::Error;

use crate::merge::RowMerger;
use crate::rect::{TileRect, TileRegion};

/// Tracks which tiles of a fixed-size grid are in use.
///
/// Tiles start out free and become reserved through [`reserve`](Self::reserve).
/// A reserved tile stays reserved for the lifetime of the grid.
#[derive(Clone)]
pub struct TileGrid {
    config: GridConfig,
    /// `true` for reserved tiles, row-major.
    occupancy: Vec<bool>,
    /// Free tiles of the region being queried, reused between queries.
    scratch: Vec<bool>,
    merger: RowMerger,
    reserved_tiles: u32,
}

impl TileGrid {
    /// Create a grid with `rows * columns` free tiles.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(rows: u32, columns: u32) -> Self {
        Self::with_config(GridConfig { rows, columns })
    }

    /// Create a grid from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_config(config: GridConfig) -> Self {
        assert!(config.rows > 0, "grid must have at least one row");
        assert!(config.columns > 0, "grid must have at least one column");

        let len = config.tile_count() as usize;
        Self {
            config,
            occupancy: vec![false; len],
            scratch: vec![false; len],
            merger: RowMerger::new(),
            reserved_tiles: 0,
        }
    }

    /// Get the configuration this grid was created with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.config.rows
    }

    /// Number of tile columns.
    pub fn columns(&self) -> u32 {
        self.config.columns
    }

    /// The region covering the whole grid.
    pub fn full_region(&self) -> TileRegion {
        TileRegion::new(0, 0, self.config.columns - 1, self.config.rows - 1)
    }

    /// Whether the tile at `(x, y)` is reserved, or `None` if it lies outside the grid.
    pub fn is_reserved(&self, x: u32, y: u32) -> Option<bool> {
        (x < self.config.columns && y < self.config.rows).then(|| self.occupancy[self.index(x, y)])
    }

    /// Number of reserved tiles.
    pub fn reserved_tiles(&self) -> u32 {
        self.reserved_tiles
    }

    /// Number of free tiles.
    pub fn free_tiles(&self) -> u32 {
        self.config.tile_count() - self.reserved_tiles
    }

    /// Current usage statistics.
    pub fn stats(&self) -> GridUsageStats {
        GridUsageStats {
            reserved_tiles: self.reserved_tiles,
            total_tiles: self.config.tile_count(),
        }
    }

    /// Find the free tiles inside `region`, merged into disjoint rectangles.
    ///
    /// The rectangles cover every free tile of the region exactly once. The
    /// grid is not modified: pick a rectangle (or part of one) and pass it
    /// to [`reserve`](Self::reserve) to claim it.
    ///
    /// # Panics
    ///
    /// Panics if the merge produced more rectangles than there are free
    /// tiles, which can only happen if the merge itself is broken.
    pub fn find_free_regions(&mut self, region: TileRegion) -> Result<Vec<TileRect>, GridError> {
        self.check_region(region)?;

        let columns = self.config.columns;
        self.scratch.fill(false);

        let mut free_count = 0_usize;
        for y in region.top..=region.bottom {
            let row_start = self.index(region.left, y);
            let row_end = self.index(region.right, y) + 1;
            let occupied = &self.occupancy[row_start..row_end];
            let free = &mut self.scratch[row_start..row_end];

            for (free, &occupied) in free.iter_mut().zip(occupied) {
                if !occupied {
                    *free = true;
                    free_count += 1;
                }
            }
        }

        let rects = self.merger.merge(&self.scratch, columns, region);
        assert!(
            rects.len() <= free_count,
            "cannot split: merge produced {} rectangles for {} free tiles",
            rects.len(),
            free_count
        );

        debug!(
            "found {} free rectangles covering {} tiles in {:?}",
            rects.len(),
            free_count,
            region
        );
        Ok(rects)
    }

    /// Mark every tile of `rect` as reserved.
    ///
    /// Tiles that are already reserved stay reserved; overlapping an earlier
    /// reservation is not an error.
    pub fn reserve(&mut self, rect: TileRect) -> Result<(), GridError> {
        self.check_rect(rect)?;
        trace!("reserving {rect:?}");

        for y in rect.y..rect.bottom() {
            let row_start = self.index(rect.x, y);
            let row_end = self.index(rect.right() - 1, y) + 1;

            for tile in &mut self.occupancy[row_start..row_end] {
                if !*tile {
                    *tile = true;
                    self.reserved_tiles += 1;
                }
            }
        }

        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.config.columns as usize + x as usize
    }

    fn check_region(&self, region: TileRegion) -> Result<(), GridError> {
        if !region.is_ordered() {
            warn!("rejecting inverted region {region:?}");
            return Err(GridError::InvertedRegion { region });
        }
        if region.right >= self.config.columns || region.bottom >= self.config.rows {
            warn!("rejecting out of bounds region {region:?}");
            return Err(GridError::RegionOutOfBounds {
                region,
                columns: self.config.columns,
                rows: self.config.rows,
            });
        }
        Ok(())
    }

    fn check_rect(&self, rect: TileRect) -> Result<(), GridError> {
        if rect.is_empty() {
            warn!("rejecting empty rect {rect:?}");
            return Err(GridError::EmptyRect { rect });
        }
        let fits_columns = rect
            .x
            .checked_add(rect.width)
            .is_some_and(|right| right <= self.config.columns);
        let fits_rows = rect
            .y
            .checked_add(rect.height)
            .is_some_and(|bottom| bottom <= self.config.rows);
        if !fits_columns || !fits_rows {
            warn!("rejecting out of bounds rect {rect:?}");
            return Err(GridError::RectOutOfBounds {
                rect,
                columns: self.config.columns,
                rows: self.config.rows,
            });
        }
        Ok(())
    }
}

impl core::fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TileGrid")
            .field("config", &self.config)
            .field("reserved_tiles", &self.reserved_tiles)
            .finish_non_exhaustive()
    }
}

/// Errors returned when a region or rectangle doesn't fit the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The region's bounds are in the wrong order.
    #[error("Region {region:?} has inverted bounds")]
    InvertedRegion {
        /// The rejected region.
        region: TileRegion,
    },
    /// The region reaches past the edge of the grid.
    #[error("Region {region:?} is out of bounds for a {columns}x{rows} grid")]
    RegionOutOfBounds {
        /// The rejected region.
        region: TileRegion,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
    /// The rectangle covers no tiles.
    #[error("Rectangle {rect:?} is empty")]
    EmptyRect {
        /// The rejected rectangle.
        rect: TileRect,
    },
    /// The rectangle reaches past the edge of the grid.
    #[error("Rectangle {rect:?} is out of bounds for a {columns}x{rows} grid")]
    RectOutOfBounds {
        /// The rejected rectangle.
        rect: TileRect,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
}

/// Dimensions of a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Number of tile rows.
    pub rows: u32,
    /// Number of tile columns.
    pub columns: u32,
}

impl GridConfig {
    /// Total number of tiles.
    pub fn tile_count(&self) -> u32 {
        self.rows * self.columns
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            // A 1024x1024 atlas page in 16 pixel tiles.
            rows: 64,
            columns: 64,
        }
    }
}

/// Usage statistics for a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridUsageStats {
    /// Number of reserved tiles.
    pub reserved_tiles: u32,
    /// Total number of tiles.
    pub total_tiles: u32,
}

impl GridUsageStats {
    /// Calculate usage percentage (0.0 to 1.0).
    pub fn usage_percentage(&self) -> f32 {
        if self.total_tiles == 0 {
            0.0
        } else {
            self.reserved_tiles as f32 / self.total_tiles as f32
        }
    }
}
