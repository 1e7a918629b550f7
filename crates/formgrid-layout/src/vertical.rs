#![forbid(unsafe_code)]

//! Column-major body grid: narrow fields stack, full-width fields break.
//!
//! Fields narrower than the column count collect in a vertical stack (the
//! *part*). A full-width field closes the part: the stack is split into
//! side-by-side columns of balanced height, attached to the *main chain*,
//! and the full-width field follows it as its own block. Once every field
//! is in the chain, [`MainChain::calculate_grid_layout`] assigns coordinates.
//!
//! Cells live in a [`CellArena`] and reference each other by [`CellId`]:
//!
//! - `down`: the next cell of the same column.
//! - `up`: the inverse of `down`.
//! - `right`: the head of the column placed to the right, starting on the
//!   row of the linking cell.
//!
//! # Split policy
//!
//! The weight of a cell is its row span. A stack whose widest cell spans `s`
//! columns can use `n = k / s` column slots out of `k` free columns. The top
//! column keeps the run of cells that minimises the tallest column, taking
//! the rest as spread evenly over the other `n - 1` slots; ties go to the
//! longer top run. The remaining cells move to the right and are split again
//! with the columns left over. Splitting stops when fewer than two slots
//! remain or the stack holds a single cell.
//!
//! # Invariants
//!
//! 1. One cell per candidate field.
//! 2. Every cell is reachable from exactly one main-chain block, through
//!    exactly one link; the graph is acyclic ([`CellArena::check_structure`]).
//! 3. Columns produced by a split fit in the column count.
//!
//! # Failure Modes
//!
//! None during layout. Fields wider than the column count are used as is and
//! widen the resulting grid. Rows and columns stop at [`MAX_GRID_EDGE`]:
//! a cell reaching past it is cut off, and cells starting on it get an empty
//! rectangle.

use formgrid_core::{GridData, MAX_GRID_EDGE, clamp_span};

use crate::body_grid::{Placement, StrategyOutput};
use crate::builder::GridDataBuilder;
use crate::error::GridStructureError;
use crate::field::GridField;

/// Index of a cell in a [`CellArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(usize);

impl CellId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One field's placement plus its links to neighbouring cells.
#[derive(Debug, Clone)]
pub struct GridCell {
    field: usize,
    data: GridData,
    right: Option<CellId>,
    down: Option<CellId>,
    up: Option<CellId>,
}

impl GridCell {
    /// Key of the field this cell places.
    #[inline]
    pub fn field(&self) -> usize {
        self.field
    }

    /// Grid data; positions are valid after layout.
    #[inline]
    pub fn data(&self) -> &GridData {
        &self.data
    }

    #[inline]
    pub fn right(&self) -> Option<CellId> {
        self.right
    }

    #[inline]
    pub fn down(&self) -> Option<CellId> {
        self.down
    }

    #[inline]
    pub fn up(&self) -> Option<CellId> {
        self.up
    }
}

/// Bottom-right corner reached by a layout pass (exclusive edges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub columns: u16,
    pub rows: u16,
}

impl Extent {
    fn union(self, other: Extent) -> Extent {
        Extent {
            columns: self.columns.max(other.columns),
            rows: self.rows.max(other.rows),
        }
    }
}

/// Owner of all cells built during one vertical layout pass.
#[derive(Debug, Clone, Default)]
pub struct CellArena {
    cells: Vec<GridCell>,
}

impl CellArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unlinked cell.
    pub fn push(&mut self, field: usize, data: GridData) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(GridCell {
            field,
            data,
            right: None,
            down: None,
            up: None,
        });
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up a cell.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[inline]
    pub fn cell(&self, id: CellId) -> &GridCell {
        &self.cells[id.0]
    }

    /// Cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &GridCell)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    /// The column starting at `head`, top to bottom.
    pub fn column(&self, head: CellId) -> impl Iterator<Item = CellId> + '_ {
        std::iter::successors(Some(head), move |id| self.cells[id.0].down)
    }

    /// Widest cell of the column starting at `head`.
    pub fn column_span(&self, head: CellId) -> u16 {
        self.column(head)
            .map(|id| self.cells[id.0].data.w)
            .max()
            .unwrap_or(0)
    }

    /// Total row span of the column starting at `head`.
    pub fn column_weight(&self, head: CellId) -> u32 {
        self.column(head).map(|id| u32::from(self.cells[id.0].data.h)).sum()
    }

    /// Append `cell` at the bottom of the column starting at `head`.
    pub fn add_down(&mut self, head: CellId, cell: CellId) {
        let last = self.column(head).last().unwrap_or(head);
        self.cells[last.0].down = Some(cell);
        self.cells[cell.0].up = Some(last);
    }

    /// Cut `cell` loose from the cell above it.
    fn detach(&mut self, cell: CellId) {
        if let Some(up) = self.cells[cell.0].up.take() {
            self.cells[up.0].down = None;
        }
    }

    /// First cell of the run to move right when the column at `head` is
    /// split with `free_columns` columns available. See the module docs.
    pub fn split_cell(&self, head: CellId, free_columns: u16) -> Option<CellId> {
        let unit = self.column_span(head).max(1);
        let slots = free_columns / unit;
        if slots < 2 {
            return None;
        }
        let total = self.column_weight(head);
        let others = u32::from(slots - 1);
        let mut best: Option<(u32, CellId)> = None;
        let mut top = 0u32;
        for id in self.column(head) {
            top += u32::from(self.cells[id.0].data.h);
            let Some(next) = self.cells[id.0].down else {
                break;
            };
            let tallest = top.max((total - top).div_ceil(others));
            if best.is_none_or(|(height, _)| tallest <= height) {
                best = Some((tallest, next));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Split the column at `head` into side-by-side columns within
    /// `column_count` columns.
    pub fn split(&mut self, head: CellId, column_count: u16) {
        let mut free = column_count;
        let mut current = head;
        while free >= 2 {
            let Some(split) = self.split_cell(current, free) else {
                break;
            };
            self.detach(split);
            self.cells[current.0].right = Some(split);
            free -= self.column_span(current);

            #[cfg(feature = "tracing")]
            tracing::trace!(
                message = "vertical_grid.split",
                head = current.index(),
                split = split.index(),
                free_columns = free
            );
            current = split;
        }
    }

    /// Assign coordinates to the column at `head` and everything to its
    /// right, with the column's top-left corner at `(x, y)`.
    ///
    /// Spans reaching past [`MAX_GRID_EDGE`] are cut off there, so cells below
    /// the last edge end up with an empty rectangle.
    pub fn calculate_grid_layout(&mut self, head: CellId, x: u16, y: u16) -> Extent {
        let span = clamp_span(x, self.column_span(head));
        let column: Vec<CellId> = self.column(head).collect();
        let mut next_row = y;
        let mut extent = Extent {
            columns: x + span,
            rows: y,
        };
        for id in column {
            let cell = &mut self.cells[id.0];
            cell.data = cell.data.with_rect(x, next_row, cell.data.w, cell.data.h).clamped();
            next_row += cell.data.h;
            extent.rows = extent.rows.max(next_row);
            let (right, row) = (cell.right, cell.data.y);
            if let Some(right) = right {
                let neighbour = self.calculate_grid_layout(right, x + span, row);
                extent = extent.union(neighbour);
            }
        }
        extent
    }

    /// Verify that the cells reachable from `roots` form a forest covering
    /// every cell exactly once.
    ///
    /// Ids issued by another arena are reported as
    /// [`GridStructureError::Dangling`] instead of being looked up.
    pub fn check_structure(&self, roots: &[CellId]) -> Result<(), GridStructureError> {
        let links = self
            .cells
            .iter()
            .flat_map(|cell| [cell.right, cell.down, cell.up].into_iter().flatten());
        if let Some(cell) = roots.iter().copied().chain(links).find(|id| id.0 >= self.cells.len()) {
            return Err(GridStructureError::Dangling { cell });
        }

        let mut incoming = vec![0usize; self.cells.len()];
        for (id, cell) in self.iter() {
            for target in [cell.right, cell.down].into_iter().flatten() {
                incoming[target.0] += 1;
                if incoming[target.0] > 1 {
                    return Err(GridStructureError::SharedCell { cell: target });
                }
            }
            if let Some(down) = cell.down {
                if self.cells[down.0].up != Some(id) {
                    return Err(GridStructureError::BrokenUpLink { cell: down });
                }
            }
        }
        for &root in roots {
            if incoming[root.0] > 0 {
                return Err(GridStructureError::SharedCell { cell: root });
            }
        }

        let mut visited = vec![false; self.cells.len()];
        let mut stack: Vec<CellId> = roots.to_vec();
        while let Some(id) = stack.pop() {
            if visited[id.0] {
                return Err(GridStructureError::Cycle { cell: id });
            }
            visited[id.0] = true;
            let cell = &self.cells[id.0];
            stack.extend(cell.right);
            stack.extend(cell.down);
        }
        match visited.iter().position(|v| !v) {
            Some(index) => Err(GridStructureError::Unreachable { cell: CellId(index) }),
            None => Ok(()),
        }
    }
}

/// The finalized blocks of a vertical layout, top to bottom.
#[derive(Debug, Clone, Default)]
pub struct MainChain {
    blocks: Vec<CellId>,
}

impl MainChain {
    /// Attach a block below everything attached so far.
    pub fn attach(&mut self, block: CellId) {
        self.blocks.push(block);
    }

    #[inline]
    pub fn blocks(&self) -> &[CellId] {
        &self.blocks
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Lay out every block, each starting below the previous one.
    pub fn calculate_grid_layout(&self, arena: &mut CellArena) -> Extent {
        let mut extent = Extent::default();
        for &block in &self.blocks {
            extent = extent.union(arena.calculate_grid_layout(block, 0, extent.rows));
        }
        extent
    }

    /// See [`CellArena::check_structure`].
    pub fn check_structure(&self, arena: &CellArena) -> Result<(), GridStructureError> {
        arena.check_structure(&self.blocks)
    }
}

/// Incremental builder of the main chain.
#[derive(Debug, Clone)]
pub struct VerticalGridBuilder {
    column_count: u16,
    arena: CellArena,
    main: MainChain,
    part: Option<CellId>,
}

impl VerticalGridBuilder {
    /// A column count of 0 is treated as 1.
    pub fn new(column_count: u16) -> Self {
        Self {
            column_count: column_count.max(1),
            arena: CellArena::new(),
            main: MainChain::default(),
            part: None,
        }
    }

    /// Add the next field, already resolved against the column count.
    pub fn add(&mut self, field: usize, data: GridData) -> CellId {
        let id = self.arena.push(field, data);
        if data.w >= self.column_count {
            self.flush_part();
            self.main.attach(id);
        } else {
            match self.part {
                Some(head) => self.arena.add_down(head, id),
                None => self.part = Some(id),
            }
        }
        id
    }

    /// Split the pending stack and attach it to the main chain.
    fn flush_part(&mut self) {
        if let Some(head) = self.part.take() {
            self.arena.split(head, self.column_count);
            self.main.attach(head);
        }
    }

    /// Close the pending stack and hand out the finished graph.
    pub fn finish(mut self) -> (CellArena, MainChain) {
        self.flush_part();
        (self.arena, self.main)
    }
}

/// Run the column-major strategy over `candidates` (indices into `fields`).
///
/// The resulting column count is never below `column_count`.
pub(crate) fn layout_vertical<F: GridField>(
    fields: &[F],
    candidates: &[usize],
    column_count: u16,
) -> StrategyOutput {
    let column_count = column_count.max(1);
    let mut builder = VerticalGridBuilder::new(column_count);
    for &index in candidates {
        builder.add(index, GridDataBuilder::from_hints(&fields[index], column_count));
    }
    let (mut arena, main) = builder.finish();
    let extent = main.calculate_grid_layout(&mut arena);
    debug_assert!(main.check_structure(&arena).is_ok());

    let placements = arena
        .iter()
        .map(|(_, cell)| Placement {
            field: cell.field,
            data: cell.data,
        })
        .collect();

    StrategyOutput {
        placements,
        grid_columns: column_count.max(extent.columns),
        grid_rows: extent.rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(column_count: u16, spans: &[(u16, u16)]) -> (CellArena, MainChain, Extent) {
        let mut builder = VerticalGridBuilder::new(column_count);
        for (i, &(w, h)) in spans.iter().enumerate() {
            builder.add(i, GridData::new(0, 0, w, h));
        }
        let (mut arena, main) = builder.finish();
        let extent = main.calculate_grid_layout(&mut arena);
        main.check_structure(&arena).expect("well-formed graph");
        (arena, main, extent)
    }

    fn rects(arena: &CellArena) -> Vec<(u16, u16, u16, u16)> {
        arena.iter().map(|(_, c)| c.data().rect()).collect()
    }

    #[test]
    fn pair_then_full_width() {
        let (arena, main, extent) = build(2, &[(1, 1), (1, 1), (2, 1)]);
        assert_eq!(main.blocks().len(), 2);
        assert_eq!(rects(&arena), vec![(0, 0, 1, 1), (1, 0, 1, 1), (0, 1, 2, 1)]);
        assert_eq!(extent, Extent { columns: 2, rows: 2 });
    }

    #[test]
    fn four_narrow_fields_fill_columns_first() {
        let (arena, _, extent) = build(2, &[(1, 1); 4]);
        assert_eq!(
            rects(&arena),
            vec![(0, 0, 1, 1), (0, 1, 1, 1), (1, 0, 1, 1), (1, 1, 1, 1)]
        );
        assert_eq!(extent.rows, 2);
    }

    #[test]
    fn odd_count_leaves_first_column_longer() {
        let (arena, _, extent) = build(2, &[(1, 1); 3]);
        assert_eq!(rects(&arena), vec![(0, 0, 1, 1), (0, 1, 1, 1), (1, 0, 1, 1)]);
        assert_eq!(extent.rows, 2);
    }

    #[test]
    fn three_columns_balance_by_weight() {
        let (arena, _, extent) = build(3, &[(1, 1); 4]);
        assert_eq!(
            rects(&arena),
            vec![(0, 0, 1, 1), (0, 1, 1, 1), (1, 0, 1, 1), (2, 0, 1, 1)]
        );
        assert_eq!(extent, Extent { columns: 3, rows: 2 });
    }

    #[test]
    fn tall_field_counts_as_its_height() {
        let (arena, _, extent) = build(2, &[(1, 2), (1, 1), (1, 1)]);
        assert_eq!(rects(&arena), vec![(0, 0, 1, 2), (1, 0, 1, 1), (1, 1, 1, 1)]);
        assert_eq!(extent.rows, 2);
    }

    #[test]
    fn wide_narrow_field_prevents_split() {
        // Widest cell spans 2 of 3 columns: only one slot.
        let (arena, _, extent) = build(3, &[(2, 1), (1, 1), (1, 1)]);
        assert_eq!(rects(&arena), vec![(0, 0, 2, 1), (0, 1, 1, 1), (0, 2, 1, 1)]);
        assert_eq!(extent, Extent { columns: 2, rows: 3 });
    }

    #[test]
    fn full_width_fields_stack_as_blocks() {
        let (arena, main, extent) = build(2, &[(2, 1), (1, 1), (2, 2), (1, 1), (1, 1)]);
        assert_eq!(main.blocks().len(), 4);
        assert_eq!(
            rects(&arena),
            vec![(0, 0, 2, 1), (0, 1, 1, 1), (0, 2, 2, 2), (0, 4, 1, 1), (1, 4, 1, 1)]
        );
        assert_eq!(extent.rows, 5);
    }

    #[test]
    fn next_block_starts_below_tallest_column() {
        let (arena, _, extent) = build(2, &[(1, 1), (1, 3), (2, 1)]);
        // [a] | [b h3] then the full-width field below row 3.
        assert_eq!(rects(&arena), vec![(0, 0, 1, 1), (1, 0, 1, 3), (0, 3, 2, 1)]);
        assert_eq!(extent.rows, 4);
    }

    #[test]
    fn over_wide_field_grows_columns() {
        let (arena, _, extent) = build(2, &[(3, 1), (1, 1)]);
        assert_eq!(rects(&arena), vec![(0, 0, 3, 1), (0, 1, 1, 1)]);
        assert_eq!(extent.columns, 3);
    }

    #[test]
    fn blocks_past_the_last_edge_are_not_shared() {
        let (arena, _, extent) = build(2, &[(2, u16::MAX), (2, 1), (2, 1)]);
        assert_eq!(
            rects(&arena),
            vec![
                (0, 0, 2, MAX_GRID_EDGE),
                (0, MAX_GRID_EDGE, 2, 0),
                (0, MAX_GRID_EDGE, 2, 0)
            ]
        );
        let placed: Vec<GridData> = arena.iter().map(|(_, c)| c.data).collect();
        assert!(crate::debug::find_overlaps(&placed).is_empty());
        assert_eq!(extent.rows, MAX_GRID_EDGE);
    }

    #[test]
    fn tall_cell_is_cut_at_the_last_edge() {
        let (arena, _, extent) = build(2, &[(2, MAX_GRID_EDGE - 1), (1, 1), (1, 5)]);
        // Narrow pair splits side by side on the last free row.
        assert_eq!(
            rects(&arena),
            vec![
                (0, 0, 2, MAX_GRID_EDGE - 1),
                (0, MAX_GRID_EDGE - 1, 1, 1),
                (1, MAX_GRID_EDGE - 1, 1, 1)
            ]
        );
        assert_eq!(extent.rows, MAX_GRID_EDGE);
    }

    #[test]
    fn single_narrow_field_is_not_split() {
        let (arena, main, extent) = build(2, &[(1, 1)]);
        assert_eq!(main.blocks().len(), 1);
        assert_eq!(arena.cell(CellId(0)).right(), None);
        assert_eq!(extent, Extent { columns: 1, rows: 1 });
    }

    #[test]
    fn empty_builder_has_no_blocks() {
        let (arena, main, extent) = build(2, &[]);
        assert!(arena.is_empty());
        assert!(main.is_empty());
        assert_eq!(extent, Extent::default());
    }

    #[test]
    fn split_cell_needs_two_slots() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::new(0, 0, 1, 1));
        let b = arena.push(1, GridData::new(0, 0, 1, 1));
        arena.add_down(a, b);
        assert_eq!(arena.split_cell(a, 1), None);
        assert_eq!(arena.split_cell(a, 2), Some(b));
        assert_eq!(arena.column_weight(a), 2);
        assert_eq!(arena.column_span(a), 1);
    }

    #[test]
    fn split_relinks_cells() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::new(0, 0, 1, 1));
        let b = arena.push(1, GridData::new(0, 0, 1, 1));
        arena.add_down(a, b);
        arena.split(a, 2);
        assert_eq!(arena.cell(a).down(), None);
        assert_eq!(arena.cell(a).right(), Some(b));
        assert_eq!(arena.cell(b).up(), None);
        assert!(arena.check_structure(&[a]).is_ok());
    }

    #[test]
    fn right_link_from_inner_cell_starts_on_its_row() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::new(0, 0, 1, 1));
        let b = arena.push(1, GridData::new(0, 0, 1, 1));
        let c = arena.push(2, GridData::new(0, 0, 1, 1));
        arena.add_down(a, b);
        arena.cells[b.0].right = Some(c);
        let extent = arena.calculate_grid_layout(a, 0, 0);
        assert_eq!(arena.cell(c).data().rect(), (1, 1, 1, 1));
        assert_eq!(extent, Extent { columns: 2, rows: 2 });
    }

    #[test]
    fn structure_detects_unreachable_cell() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::default());
        arena.push(1, GridData::default());
        assert_eq!(
            arena.check_structure(&[a]),
            Err(GridStructureError::Unreachable { cell: CellId(1) })
        );
    }

    #[test]
    fn structure_detects_shared_cell() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::default());
        let b = arena.push(1, GridData::default());
        arena.add_down(a, b);
        arena.cells[a.0].right = Some(b);
        assert_eq!(
            arena.check_structure(&[a]),
            Err(GridStructureError::SharedCell { cell: b })
        );
    }

    #[test]
    fn structure_detects_cycle() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::default());
        let b = arena.push(1, GridData::default());
        arena.add_down(a, b);
        arena.cells[b.0].right = Some(a);
        // `a` now has an incoming link while also being a root.
        assert_eq!(
            arena.check_structure(&[a]),
            Err(GridStructureError::SharedCell { cell: a })
        );
        // Without the root entry the loop is unreachable.
        assert!(matches!(
            arena.check_structure(&[]),
            Err(GridStructureError::Unreachable { .. })
        ));
    }

    #[test]
    fn structure_rejects_foreign_ids() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::default());
        assert_eq!(
            arena.check_structure(&[CellId(7)]),
            Err(GridStructureError::Dangling { cell: CellId(7) })
        );
        arena.cells[a.0].right = Some(CellId(3));
        assert_eq!(
            arena.check_structure(&[a]),
            Err(GridStructureError::Dangling { cell: CellId(3) })
        );
    }

    #[test]
    fn structure_detects_broken_up_link() {
        let mut arena = CellArena::new();
        let a = arena.push(0, GridData::default());
        let b = arena.push(1, GridData::default());
        arena.cells[a.0].down = Some(b);
        assert_eq!(
            arena.check_structure(&[a]),
            Err(GridStructureError::BrokenUpLink { cell: b })
        );
    }
}
