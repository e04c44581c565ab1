// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A free-space allocator over a fixed grid of tiles, used to pack glyph and
//! image bitmaps into shared atlas textures.
//!
//! # Usage
//!
//! A [`TileGrid`] tracks which tiles of an atlas page are in use. The atlas
//! manager asks it for the free space inside a region, picks one of the
//! returned rectangles, copies its bitmap data there, and then commits the
//! rectangle with [`TileGrid::reserve`].
//!
//! ```
//! use tile_grid::{TileGrid, TileRect};
//!
//! let mut grid = TileGrid::new(4, 4);
//! grid.reserve(TileRect::new(1, 1, 2, 1)).unwrap();
//!
//! let free = grid.find_free_regions(grid.full_region()).unwrap();
//! let area: u32 = free.iter().map(|rect| rect.area()).sum();
//! assert_eq!(area, 14);
//! ```
//!
//! Reservations are permanent: there is no way to free a tile once it has
//! been reserved.
//!
//! # Features
//!
//! - `std` (enabled by default): Enable `std` support in dependencies.
//!
//! The crate itself only requires `alloc`.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod grid;
pub mod interval;
pub mod merge;
pub mod rect;

pub use grid::{GridConfig, GridError, GridUsageStats, TileGrid};
pub use rect::{TileRect, TileRegion};
