// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merging rows of set cells into rectangles.
//!
//! [`RowMerger`] works in two steps. First every row of the query region is
//! scanned into runs of consecutive set cells. Then the rows are walked top
//! to bottom, carrying the rectangles that may still grow downward: a
//! rectangle grows by one row when some run of the next row covers its whole
//! column span, and is finished as soon as no run does. Whatever part of a
//! run is not claimed by a growing rectangle starts a new one.
//!
//! The result covers every set cell exactly once, and every rectangle keeps
//! the same column span over its whole height. It is a greedy tiling and
//! makes no attempt to use the fewest rectangles possible.

use alloc::vec::Vec;
use core::mem;
use smallvec::SmallVec;

use crate::interval::{IntervalId, IntervalPool};
use crate::rect::{TileRect, TileRegion};

/// Runs of set cells in a single row, left to right.
type RowRuns = SmallVec<[IntervalId; 4]>;

/// A rectangle that may still grow into the next row.
#[derive(Copy, Clone, Debug)]
struct GrowingRect {
    rect: TileRect,
    /// Whether a run in the row being processed covered this rectangle.
    growing: bool,
}

/// Turns a grid of booleans into disjoint rectangles covering its `true` cells.
///
/// The merger keeps its interval pool and scratch buffers between calls, so
/// repeated merges over similar grids stop allocating once warmed up.
#[derive(Clone, Debug, Default)]
pub struct RowMerger {
    pool: IntervalPool,
    rows: Vec<RowRuns>,
    current: Vec<GrowingRect>,
    next: Vec<GrowingRect>,
    /// Interval pieces of the row being processed that have not been split.
    pieces: Vec<IntervalId>,
}

impl RowMerger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The interval pool backing this merger.
    pub fn pool(&self) -> &IntervalPool {
        &self.pool
    }

    /// Cover the `true` cells of `buffer` inside `region` with rectangles.
    ///
    /// `buffer` is a row-major grid with `columns` cells per row. Cells
    /// outside `region` are ignored. The returned rectangles use the same
    /// coordinates as `buffer`.
    ///
    /// # Panics
    ///
    /// Panics if `region` is inverted or does not fit inside `buffer`.
    pub fn merge(&mut self, buffer: &[bool], columns: u32, region: TileRegion) -> Vec<TileRect> {
        assert!(region.is_ordered(), "merge region must not be inverted");
        assert!(
            region.right < columns
                && (region.bottom as usize + 1) * columns as usize <= buffer.len(),
            "merge region must lie within the buffer"
        );

        self.extract_rows(buffer, columns, region);

        let Self {
            pool,
            rows,
            current,
            next,
            pieces,
        } = self;

        let mut basket = Vec::new();
        current.clear();

        for (runs, y) in rows.iter().zip(region.top..=region.bottom) {
            grow_row(pool, runs, current, pieces);
            finish_row(pool, y, current, next, pieces, &mut basket);
            mem::swap(current, next);
        }

        basket.extend(current.drain(..).map(|entry| entry.rect));

        debug_assert_eq!(pool.live(), 0, "every interval must be released");
        basket
    }

    /// Scan each row of `region` into runs of set cells.
    fn extract_rows(&mut self, buffer: &[bool], columns: u32, region: TileRegion) {
        let height = region.height() as usize;
        let stride = columns as usize;

        // Keep the inline storage of rows from earlier calls around.
        for runs in &mut self.rows {
            runs.clear();
        }
        if self.rows.len() < height {
            self.rows.resize_with(height, RowRuns::new);
        }

        for (runs, y) in self.rows.iter_mut().zip(region.top..=region.bottom) {
            let row = &buffer[y as usize * stride..][..stride];
            let mut run_start = None;

            for x in region.left..=region.right {
                match (row[x as usize], run_start) {
                    (true, None) => run_start = Some(x),
                    (false, Some(start)) => {
                        runs.push(self.pool.acquire(start, x - 1, false));
                        run_start = None;
                    }
                    _ => {}
                }
            }

            if let Some(start) = run_start {
                runs.push(self.pool.acquire(start, region.right, false));
            }
        }
    }
}

/// Match the runs of a row against the rectangles carried from the row above.
///
/// Rectangles in `current` are sorted by their left edge and never overlap,
/// so a single cursor walks them once for the whole row. Every run is either
/// pushed to `pieces` as is, or split around the rectangles it covers, in
/// which case the split pieces go to `pieces` and the run is released.
fn grow_row(
    pool: &mut IntervalPool,
    runs: &[IntervalId],
    current: &mut [GrowingRect],
    pieces: &mut Vec<IntervalId>,
) {
    pieces.clear();
    for entry in current.iter_mut() {
        entry.growing = false;
    }

    let mut cursor = 0;
    for &run in runs {
        let mut pending = Some(run);

        while let Some(piece) = pending {
            let Some(candidate) = current.get_mut(cursor) else {
                pieces.push(piece);
                break;
            };

            let span = *pool.get(piece);
            let left = candidate.rect.x;
            let right = candidate.rect.right() - 1;

            if left < span.start {
                // Starts left of this piece, and every later run starts further right.
                cursor += 1;
                continue;
            }
            if left > span.end {
                pieces.push(piece);
                break;
            }
            if !span.fits(left, right) {
                // Sticks out past this piece, so nothing further right fits it either.
                cursor += 1;
                pieces.push(piece);
                break;
            }

            let split = pool.split_around(piece, left, right, true);
            pool.release(piece);
            candidate.growing = true;
            cursor += 1;

            pieces.extend(split.before);
            pieces.push(split.matched);
            pending = split.after;
        }
    }
}

/// Grow, finish or create rectangles once row `y` has been matched.
///
/// Rectangles that grew move to `next` one row taller, the others are done
/// and go to `basket`. Unmarked pieces start new rectangles in `next`. All
/// pieces are released.
fn finish_row(
    pool: &mut IntervalPool,
    y: u32,
    current: &mut Vec<GrowingRect>,
    next: &mut Vec<GrowingRect>,
    pieces: &mut Vec<IntervalId>,
    basket: &mut Vec<TileRect>,
) {
    next.clear();

    for entry in current.drain(..) {
        if entry.growing {
            next.push(GrowingRect {
                rect: TileRect {
                    height: entry.rect.height + 1,
                    ..entry.rect
                },
                growing: false,
            });
        } else {
            basket.push(entry.rect);
        }
    }

    for piece in pieces.drain(..) {
        let interval = *pool.get(piece);
        if !interval.mark {
            next.push(GrowingRect {
                rect: TileRect::new(interval.start, y, interval.width(), 1),
                growing: false,
            });
        }
        pool.release(piece);
    }

    next.sort_unstable_by_key(|entry| entry.rect.x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Build a buffer from rows of `#` (set) and `.` (unset).
    fn buffer(rows: &[&str]) -> (Vec<bool>, u32) {
        let columns = rows[0].len() as u32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '#'))
            .collect();
        (cells, columns)
    }

    fn full(rows: usize, columns: u32) -> TileRegion {
        TileRegion::new(0, 0, columns - 1, rows as u32 - 1)
    }

    /// Check that `rects` cover exactly the set cells of `buffer` inside `region`.
    fn assert_exact_cover(buffer: &[bool], columns: u32, region: TileRegion, rects: &[TileRect]) {
        let mut hits = vec![0_u32; buffer.len()];
        for rect in rects {
            assert!(!rect.is_empty(), "merged rects must not be empty");
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    hits[(y * columns + x) as usize] += 1;
                }
            }
        }
        for (index, (&set, &count)) in buffer.iter().zip(&hits).enumerate() {
            let x = index as u32 % columns;
            let y = index as u32 / columns;
            let inside =
                x >= region.left && x <= region.right && y >= region.top && y <= region.bottom;
            let expected = u32::from(set && inside);
            assert_eq!(count, expected, "cell ({x}, {y}) covered {count} times");
        }
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        let (cells, columns) = buffer(&["....", "....", "...."]);
        let mut merger = RowMerger::new();
        assert!(merger.merge(&cells, columns, full(3, columns)).is_empty());
    }

    #[test]
    fn single_cell_yields_unit_rect() {
        let (cells, columns) = buffer(&["....", "..#.", "...."]);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, full(3, columns));
        assert_eq!(rects, vec![TileRect::new(2, 1, 1, 1)]);
    }

    #[test]
    fn full_block_is_one_rect() {
        let (cells, columns) = buffer(&["####", "####", "####", "####"]);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, full(4, columns));
        assert_eq!(rects, vec![TileRect::new(0, 0, 4, 4)]);
    }

    #[test]
    fn equal_width_runs_stack() {
        let (cells, columns) = buffer(&[".##..#", ".##..#", ".##...", "......"]);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, full(4, columns));
        assert_eq!(
            rects,
            vec![TileRect::new(5, 0, 1, 2), TileRect::new(1, 0, 2, 3)]
        );
    }

    #[test]
    fn wider_run_below_grows_and_splits() {
        let (cells, columns) = buffer(&["..##..", "######"]);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, full(2, columns));
        assert_exact_cover(&cells, columns, full(2, columns), &rects);
        assert_eq!(
            rects,
            vec![
                TileRect::new(0, 1, 2, 1),
                TileRect::new(2, 0, 2, 2),
                TileRect::new(4, 1, 2, 1),
            ]
        );
    }

    #[test]
    fn narrower_run_below_finishes_rect() {
        let (cells, columns) = buffer(&["######", "..##.."]);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, full(2, columns));
        assert_eq!(
            rects,
            vec![TileRect::new(0, 0, 6, 1), TileRect::new(2, 1, 2, 1)]
        );
    }

    #[test]
    fn one_run_feeds_several_rects() {
        let (cells, columns) = buffer(&["#.##.#", "######", "######"]);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, full(3, columns));
        assert_exact_cover(&cells, columns, full(3, columns), &rects);
        assert_eq!(
            rects,
            vec![
                TileRect::new(0, 0, 1, 3),
                TileRect::new(1, 1, 1, 2),
                TileRect::new(2, 0, 2, 3),
                TileRect::new(4, 1, 1, 2),
                TileRect::new(5, 0, 1, 3),
            ]
        );
    }

    #[test]
    fn overhanging_rect_stops_the_chain() {
        // The second rect spans columns 3..=6 but the run below ends at 5.
        let (cells, columns) = buffer(&["##.####.", "######.."]);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, full(2, columns));
        assert_exact_cover(&cells, columns, full(2, columns), &rects);
        assert!(rects.contains(&TileRect::new(0, 0, 2, 2)));
        assert!(rects.contains(&TileRect::new(3, 0, 4, 1)));
        assert!(rects.contains(&TileRect::new(2, 1, 4, 1)));
        assert_eq!(rects.len(), 3);
    }

    #[test]
    fn region_limits_the_scan() {
        let (cells, columns) = buffer(&["######", "######", "######", "######"]);
        let region = TileRegion::new(1, 1, 3, 2);
        let mut merger = RowMerger::new();
        let rects = merger.merge(&cells, columns, region);
        assert_eq!(rects, vec![TileRect::new(1, 1, 3, 2)]);
        assert_exact_cover(&cells, columns, region, &rects);
    }

    #[test]
    fn pool_is_drained_and_reused() {
        let (cells, columns) = buffer(&["#.#.#.", ".#.#.#", "##..##", "#.##.#"]);
        let mut merger = RowMerger::new();
        let first = merger.merge(&cells, columns, full(4, columns));
        let capacity = merger.pool().capacity();
        assert_eq!(merger.pool().live(), 0);

        for _ in 0..100 {
            assert_eq!(merger.merge(&cells, columns, full(4, columns)), first);
        }
        assert_eq!(merger.pool().capacity(), capacity);
        assert_eq!(merger.pool().live(), 0);
    }

    #[test]
    fn shorter_region_after_taller_one() {
        let (cells, columns) = buffer(&["##", "##", "##", "##"]);
        let mut merger = RowMerger::new();
        assert_eq!(
            merger.merge(&cells, columns, full(4, columns)),
            vec![TileRect::new(0, 0, 2, 4)]
        );
        assert_eq!(
            merger.merge(&cells, columns, TileRegion::new(0, 2, 1, 3)),
            vec![TileRect::new(0, 2, 2, 2)]
        );
    }

    #[test]
    #[should_panic(expected = "must lie within the buffer")]
    fn region_past_buffer_panics() {
        let (cells, columns) = buffer(&["##", "##"]);
        RowMerger::new().merge(&cells, columns, TileRegion::new(0, 0, 1, 2));
    }
}
