// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(missing_docs, reason = "Not needed for benchmarks")]

use criterion::{criterion_group, criterion_main};
use tile_grid_bench::{grid, merge};

criterion_group!(m, merge::merge);
criterion_group!(g, grid::grid);
criterion_main!(m, g);
