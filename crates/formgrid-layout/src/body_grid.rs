#![forbid(unsafe_code)]

//! The body grid driver: classify, pick a mode, run a strategy, commit.
//!
//! [`BodyGrid::validate`] is the single entry point. It is a pure function of
//! the fields' visibility, role and hints plus the column count; no state
//! survives between calls except the resolved column and row counts.
//!
//! # Pipeline
//!
//! 1. [`classify`]: hidden fields get a single-column placeholder, visible
//!    process buttons are skipped, everything else is a candidate.
//! 2. [`LayoutMode::select`]: static when every candidate is positioned,
//!    dynamic otherwise.
//! 3. Static layout trusts positions; dynamic layout runs the configured
//!    [`BodyGridKind`].
//! 4. Every candidate's grid data is written back.

use std::sync::Arc;
use std::time::Instant;

use formgrid_core::{FieldRole, GridData, MAX_GRID_EDGE};
use serde::{Deserialize, Serialize};

use crate::builder::GridDataBuilder;
use crate::debug::{GridLayoutRecord, LayoutDebugger};
use crate::field::GridField;
use crate::horizontal::layout_horizontal;
use crate::vertical::layout_vertical;

/// Dynamic layout strategy of a group box body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyGridKind {
    /// Column-major stacking with full-width breaks.
    #[default]
    Vertical,
    /// Row-major flow with wraparound.
    Horizontal,
}

impl BodyGridKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// How the last validation placed its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Explicit positions used verbatim.
    Static,
    /// Positions computed by the strategy.
    Dynamic,
}

impl LayoutMode {
    /// Static only if at least one candidate is positioned and none is not.
    #[must_use]
    pub fn select(classification: &Classification) -> Self {
        if classification.positioned > 0 && classification.unpositioned == 0 {
            Self::Static
        } else {
            Self::Dynamic
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

/// Candidates of one validation pass, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Indices of visible controls.
    pub candidates: Vec<usize>,
    /// Candidates with both `x` and `y` set.
    pub positioned: usize,
    /// Candidates missing `x` or `y`.
    pub unpositioned: usize,
}

/// Split `fields` into candidates and the rest.
///
/// Hidden fields receive their placeholder grid data here.
pub fn classify<F: GridField>(fields: &mut [F]) -> Classification {
    let mut classification = Classification::default();
    for (index, field) in fields.iter_mut().enumerate() {
        if !field.is_visible() {
            let placeholder = GridDataBuilder::placeholder(field);
            field.set_grid_data(placeholder);
            continue;
        }
        if field.role() == FieldRole::ProcessButton {
            continue;
        }
        if field.grid_data_hints().is_positioned() {
            classification.positioned += 1;
        } else {
            classification.unpositioned += 1;
        }
        classification.candidates.push(index);
    }
    classification
}

/// Resolved grid data for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the field in the validated slice.
    pub field: usize,
    pub data: GridData,
}

/// Result of a layout strategy before it is committed.
#[derive(Debug, Clone, Default)]
pub(crate) struct StrategyOutput {
    pub placements: Vec<Placement>,
    pub grid_columns: u16,
    pub grid_rows: u16,
}

/// Place candidates at their hinted positions.
///
/// Full-width hints resolve against the widest `x + w` among candidates; the
/// grid size is the bounding box of the result. Spans reaching past
/// [`MAX_GRID_EDGE`] are cut off there.
pub(crate) fn layout_static<F: GridField>(fields: &[F], candidates: &[usize]) -> StrategyOutput {
    let reference_width = candidates
        .iter()
        .map(|&index| {
            let hints = fields[index].grid_data_hints();
            hints.x.unwrap_or(0).saturating_add(hints.w)
        })
        .max()
        .unwrap_or(0);

    let placements: Vec<Placement> = candidates
        .iter()
        .map(|&index| Placement {
            field: index,
            data: GridDataBuilder::from_hints(&fields[index], reference_width).clamped(),
        })
        .collect();

    StrategyOutput {
        grid_columns: outer_edge(placements.iter().map(|p| p.data.right())),
        grid_rows: outer_edge(placements.iter().map(|p| p.data.bottom())),
        placements,
    }
}

/// Largest of `edges` as a grid count, 0 when there are none.
fn outer_edge(edges: impl Iterator<Item = u32>) -> u16 {
    edges
        .max()
        .map_or(0, |edge| u16::try_from(edge).unwrap_or(MAX_GRID_EDGE))
}

/// Body grid of one group box.
#[derive(Debug, Clone, Default)]
pub struct BodyGrid {
    kind: BodyGridKind,
    grid_columns: u16,
    grid_rows: u16,
    mode: Option<LayoutMode>,
    debugger: Option<(String, Arc<LayoutDebugger>)>,
}

impl BodyGrid {
    pub fn new(kind: BodyGridKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Record every validation under `name` while `debugger` is enabled.
    #[must_use]
    pub fn with_debugger(mut self, name: impl Into<String>, debugger: Arc<LayoutDebugger>) -> Self {
        self.set_debugger(name, debugger);
        self
    }

    pub fn set_debugger(&mut self, name: impl Into<String>, debugger: Arc<LayoutDebugger>) {
        self.debugger = Some((name.into(), debugger));
    }

    #[inline]
    pub fn kind(&self) -> BodyGridKind {
        self.kind
    }

    /// Change the strategy. Takes effect on the next validation.
    pub fn set_kind(&mut self, kind: BodyGridKind) {
        self.kind = kind;
    }

    /// Columns of the last validation. The vertical strategy may report more
    /// than the requested column count.
    #[inline]
    pub fn grid_column_count(&self) -> u16 {
        self.grid_columns
    }

    /// Rows of the last validation; 0 when nothing was placed.
    #[inline]
    pub fn grid_row_count(&self) -> u16 {
        self.grid_rows
    }

    /// Mode of the last validation, `None` before the first one.
    #[inline]
    pub fn layout_mode(&self) -> Option<LayoutMode> {
        self.mode
    }

    /// Lay out `fields` on a grid of `column_count` columns and write the
    /// resulting grid data onto every field.
    pub fn validate<F: GridField>(&mut self, fields: &mut [F], column_count: u16) {
        let recording = self.debugger.as_ref().filter(|(_, d)| d.enabled()).is_some();
        let start = recording.then(Instant::now);

        self.grid_columns = column_count;
        self.grid_rows = 0;

        let classification = classify(fields);
        let mode = LayoutMode::select(&classification);
        let candidates = &classification.candidates;
        let output = match (mode, self.kind) {
            (LayoutMode::Static, _) => layout_static(fields, candidates),
            (LayoutMode::Dynamic, BodyGridKind::Horizontal) => {
                layout_horizontal(fields, candidates, column_count)
            }
            (LayoutMode::Dynamic, BodyGridKind::Vertical) => {
                layout_vertical(fields, candidates, column_count)
            }
        };

        for placement in &output.placements {
            fields[placement.field].set_grid_data(placement.data);
        }
        self.grid_columns = output.grid_columns;
        self.grid_rows = output.grid_rows;
        self.mode = Some(mode);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "body_grid.validate",
            kind = self.kind.as_str(),
            mode = mode.as_str(),
            column_count,
            columns = self.grid_columns,
            rows = self.grid_rows,
            candidates = candidates.len(),
            fields = fields.len()
        );

        if let (Some((name, debugger)), Some(start)) = (&self.debugger, start) {
            let mut record = GridLayoutRecord::new(name.clone(), self.kind, mode);
            record.column_count = column_count;
            record.grid_columns = self.grid_columns;
            record.grid_rows = self.grid_rows;
            record.placements = output.placements;
            record.solve_time = Some(start.elapsed());
            debugger.record(record);
        }
    }
}
