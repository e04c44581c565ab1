// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(missing_docs, reason = "Not needed for benchmarks")]

pub mod grid;
pub mod merge;

pub const SEED: [u8; 32] = [0; 32];
