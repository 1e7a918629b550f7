#![forbid(unsafe_code)]

//! Row-major body grid: fields flow left to right, top to bottom.
//!
//! [`HorizontalGridMatrix`] keeps a sparse map of occupied cells and a
//! cursor at the first free cell. A field that does not fit at the cursor
//! leaves a dummy cell behind and the cursor moves on until it does.
//!
//! # Invariants
//!
//! 1. No two fields share a cell.
//! 2. `next_free` is never an occupied cell.
//! 3. Spans wider than the column count are clamped to it, so every field
//!    fits at column 0 of a fresh row and placement always terminates.
//! 4. `row_count` is the bottom edge of the lowest placed field and never
//!    exceeds [`MAX_GRID_EDGE`].
//!
//! # Failure Modes
//!
//! None. Zero spans are treated as 1. A field reaching past
//! [`MAX_GRID_EDGE`] is cut off there; once the cursor sits on that edge,
//! every further field gets an empty rectangle on it and covers no cells.

use formgrid_core::{GridData, GridPos, MAX_GRID_EDGE, clamp_span};
use rustc_hash::FxHashMap;

use crate::body_grid::{Placement, StrategyOutput};
use crate::builder::GridDataBuilder;
use crate::field::GridField;

/// Content of an occupied matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixCell {
    /// Covered by the field with this key.
    Field(usize),
    /// Skipped: the field at the cursor did not fit here.
    Dummy,
}

/// Occupancy matrix with a fixed column count and unbounded rows.
#[derive(Debug, Clone)]
pub struct HorizontalGridMatrix {
    column_count: u16,
    cells: FxHashMap<GridPos, MatrixCell>,
    next_free: GridPos,
    row_count: u16,
}

impl HorizontalGridMatrix {
    /// Create an empty matrix. A column count of 0 is treated as 1.
    pub fn new(column_count: u16) -> Self {
        Self {
            column_count: column_count.max(1),
            cells: FxHashMap::default(),
            next_free: GridPos::default(),
            row_count: 0,
        }
    }

    #[inline]
    pub fn column_count(&self) -> u16 {
        self.column_count
    }

    /// Rows covered by placed fields.
    #[inline]
    pub fn row_count(&self) -> u16 {
        self.row_count
    }

    /// The cursor: first unoccupied cell in row-major order.
    #[inline]
    pub fn next_free(&self) -> GridPos {
        self.next_free
    }

    /// What occupies `pos`, if anything.
    pub fn cell(&self, pos: GridPos) -> Option<MatrixCell> {
        self.cells.get(&pos).copied()
    }

    /// Number of dummy cells inserted so far.
    pub fn dummy_count(&self) -> usize {
        self.cells.values().filter(|c| **c == MatrixCell::Dummy).count()
    }

    /// Place the field `key` spanning `w × h` cells.
    ///
    /// Returns the rectangle the field received; only the positional part of
    /// the returned [`GridData`] is meaningful.
    pub fn add(&mut self, key: usize, w: u16, h: u16) -> GridData {
        let w = w.clamp(1, self.column_count);
        loop {
            let origin = self.next_free;
            if origin.y == MAX_GRID_EDGE {
                #[cfg(feature = "tracing")]
                tracing::trace!(message = "horizontal_grid.overflow", field = key, w, h);
                return GridData::new(0, MAX_GRID_EDGE, w, 0);
            }

            let h = clamp_span(origin.y, h.max(1));
            if self.fits(origin, w, h) {
                for y in origin.y..origin.y + h {
                    for x in origin.x..origin.x + w {
                        self.cells.insert(GridPos::new(x, y), MatrixCell::Field(key));
                    }
                }
                self.row_count = self.row_count.max(origin.y + h);
                self.advance();
                return GridData::new(origin.x, origin.y, w, h);
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(
                message = "horizontal_grid.dummy",
                field = key,
                x = origin.x,
                y = origin.y,
                w,
                h
            );
            self.cells.insert(origin, MatrixCell::Dummy);
            self.advance();
        }
    }

    /// Whether a `w × h` rectangle at `origin` stays inside the columns and
    /// touches no occupied cell.
    fn fits(&self, origin: GridPos, w: u16, h: u16) -> bool {
        if w > self.column_count - origin.x {
            return false;
        }
        (origin.y..origin.y + h)
            .all(|y| (origin.x..origin.x + w).all(|x| !self.cells.contains_key(&GridPos::new(x, y))))
    }

    /// Move the cursor to the next unoccupied cell in row-major order.
    ///
    /// Stops on the first cell of the row at [`MAX_GRID_EDGE`], which is never
    /// occupied.
    fn advance(&mut self) {
        loop {
            self.next_free.x += 1;
            if self.next_free.x >= self.column_count {
                self.next_free.x = 0;
                self.next_free.y += 1;
            }
            if self.next_free.y == MAX_GRID_EDGE {
                self.next_free.x = 0;
                break;
            }
            if !self.cells.contains_key(&self.next_free) {
                break;
            }
        }
    }
}

/// Run the row-major strategy over `candidates` (indices into `fields`).
///
/// The column count never changes, except that 0 is treated as 1.
pub(crate) fn layout_horizontal<F: GridField>(
    fields: &[F],
    candidates: &[usize],
    column_count: u16,
) -> StrategyOutput {
    let mut matrix = HorizontalGridMatrix::new(column_count);
    let placements = candidates
        .iter()
        .map(|&index| {
            let data = GridDataBuilder::from_hints(&fields[index], column_count);
            let rect = matrix.add(index, data.w, data.h);
            Placement {
                field: index,
                data: data.with_rect(rect.x, rect.y, rect.w, rect.h),
            }
        })
        .collect();

    StrategyOutput {
        placements,
        grid_columns: matrix.column_count(),
        grid_rows: matrix.row_count(),
    }
}
