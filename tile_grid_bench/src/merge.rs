// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tile_grid::TileRegion;
use tile_grid::merge::RowMerger;

use crate::SEED;

const SIZE: u32 = 128;

pub fn merge(c: &mut Criterion) {
    merge_pattern(c, "merge_128_all_set", |_| true);
    merge_pattern(c, "merge_128_checkerboard", |i| (i + i / SIZE as usize) % 2 == 0);

    let mut rng = SmallRng::from_seed(SEED);
    let random: Vec<bool> = (0..(SIZE * SIZE)).map(|_| rng.random_bool(0.7)).collect();
    merge_pattern(c, "merge_128_random_70", |i| random[i]);
}

/// Merge a `SIZE`x`SIZE` buffer whose cells are set by `cell`.
fn merge_pattern(c: &mut Criterion, name: &str, cell: impl Fn(usize) -> bool) {
    let buffer: Vec<bool> = (0..(SIZE * SIZE) as usize).map(cell).collect();
    let region = TileRegion::new(0, 0, SIZE - 1, SIZE - 1);
    let mut merger = RowMerger::new();

    let mut g = c.benchmark_group("merge");
    g.bench_function(name, |b| {
        b.iter(|| black_box(merger.merge(&buffer, SIZE, region)));
    });
    g.finish();
}
