// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile grid tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![allow(
    missing_docs,
    clippy::missing_assert_message,
    reason = "Test helpers"
)]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tile_grid::{TileGrid, TileRect, TileRegion};

pub const SEED: [u8; 32] = [0; 32];

/// A seeded generator, so failures reproduce.
pub fn rng(salt: u8) -> SmallRng {
    let mut seed = SEED;
    seed[0] = salt;
    SmallRng::from_seed(seed)
}

/// A rectangle of random size and position that fits inside `grid`.
pub fn random_rect(rng: &mut SmallRng, grid: &TileGrid, max_size: u32) -> TileRect {
    let width = rng.random_range(1..=max_size.min(grid.columns()));
    let height = rng.random_range(1..=max_size.min(grid.rows()));
    let x = rng.random_range(0..=grid.columns() - width);
    let y = rng.random_range(0..=grid.rows() - height);
    TileRect::new(x, y, width, height)
}

/// A non-empty region that fits inside `grid`.
pub fn random_region(rng: &mut SmallRng, grid: &TileGrid) -> TileRegion {
    let left = rng.random_range(0..grid.columns());
    let right = rng.random_range(left..grid.columns());
    let top = rng.random_range(0..grid.rows());
    let bottom = rng.random_range(top..grid.rows());
    TileRegion::new(left, top, right, bottom)
}

/// A grid with `count` random reservations.
pub fn fragmented_grid(rng: &mut SmallRng, rows: u32, columns: u32, count: usize) -> TileGrid {
    let mut grid = TileGrid::new(rows, columns);
    for _ in 0..count {
        let rect = random_rect(rng, &grid, 4);
        grid.reserve(rect).unwrap();
    }
    grid
}

/// How many of `rects` cover each tile of `grid`, row-major.
pub fn coverage(grid: &TileGrid, rects: &[TileRect]) -> Vec<u32> {
    let columns = grid.columns() as usize;
    let mut hits = vec![0_u32; columns * grid.rows() as usize];
    for rect in rects {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                hits[y as usize * columns + x as usize] += 1;
            }
        }
    }
    hits
}

/// Assert that `rects` cover exactly the free tiles of `region`, each once.
pub fn assert_exact_cover(grid: &TileGrid, region: TileRegion, rects: &[TileRect]) {
    let hits = coverage(grid, rects);
    for y in 0..grid.rows() {
        for x in 0..grid.columns() {
            let inside = x >= region.left && x <= region.right && y >= region.top && y <= region.bottom;
            let free = grid.is_reserved(x, y) == Some(false);
            let expected = u32::from(inside && free);
            let actual = hits[(y * grid.columns() + x) as usize];
            assert_eq!(
                actual, expected,
                "tile ({x}, {y}) covered {actual} times, expected {expected}"
            );
        }
    }
}

/// Sum of the areas of `rects`.
pub fn total_area(rects: &[TileRect]) -> u32 {
    rects.iter().map(TileRect::area).sum()
}
