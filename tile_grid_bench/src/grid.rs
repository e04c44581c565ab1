// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tile_grid::{TileGrid, TileRect};

use crate::SEED;

const ROWS: u32 = 64;
const COLUMNS: u32 = 64;

pub fn grid(c: &mut Criterion) {
    query_fragmented(c);
    fill_until_full(c);
}

/// Query the free space of a grid with 200 random reservations.
fn query_fragmented(c: &mut Criterion) {
    let mut rng = SmallRng::from_seed(SEED);
    let mut grid = TileGrid::new(ROWS, COLUMNS);
    for _ in 0..200 {
        let width = rng.random_range(1..=4);
        let height = rng.random_range(1..=4);
        let x = rng.random_range(0..=COLUMNS - width);
        let y = rng.random_range(0..=ROWS - height);
        grid.reserve(TileRect::new(x, y, width, height)).unwrap();
    }
    let region = grid.full_region();

    let mut g = c.benchmark_group("grid");
    g.bench_function("query_64_fragmented_200", |b| {
        b.iter(|| black_box(grid.find_free_regions(region).unwrap()));
    });
    g.finish();
}

/// Pack 2x2 cells into an empty grid until none fit, the way a glyph atlas fills a page.
fn fill_until_full(c: &mut Criterion) {
    let mut g = c.benchmark_group("grid");
    g.bench_function("fill_64_with_2x2", |b| {
        b.iter(|| {
            let mut grid = TileGrid::new(ROWS, COLUMNS);
            let mut count = 0_u32;
            loop {
                let rects = grid.find_free_regions(grid.full_region()).unwrap();
                let Some(rect) = rects.iter().find(|r| r.width >= 2 && r.height >= 2) else {
                    break;
                };
                grid.reserve(TileRect::new(rect.x, rect.y, 2, 2)).unwrap();
                count += 1;
            }
            black_box(count);
        });
    });
    g.finish();
}
