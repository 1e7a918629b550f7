#![forbid(unsafe_code)]

//! Body grid debugging utilities.
//!
//! Provides introspection into grid validations:
//! - Recording of every placement a validation produced
//! - Detection of overlapping placements and row count mismatches
//! - Export of the recorded validations as JSON
//!
//! The engine never checks its own output at runtime. These helpers exist
//! so tests, fuzz targets and tooling can assert the grid invariants.
//!
//! # Usage
//!
//! ```ignore
//! use formgrid_layout::debug::LayoutDebugger;
//! use formgrid_layout::{BodyGrid, BodyGridKind};
//!
//! let debugger = LayoutDebugger::new();
//! debugger.set_enabled(true);
//! let mut grid = BodyGrid::new(BodyGridKind::Vertical).with_debugger("details", debugger.clone());
//!
//! // ... validate ...
//!
//! for record in debugger.overlapping() {
//!     eprintln!("{}", record.summary());
//! }
//! ```

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use formgrid_core::GridData;
use serde_json::json;

use crate::body_grid::{BodyGridKind, LayoutMode, Placement};

/// Index pairs `(i, j)`, `i < j`, of rectangles sharing at least one cell.
pub fn find_overlaps(data: &[GridData]) -> Vec<(usize, usize)> {
    let mut overlaps = Vec::new();
    for (i, a) in data.iter().enumerate() {
        for (j, b) in data.iter().enumerate().skip(i + 1) {
            if a.intersects(b) {
                overlaps.push((i, j));
            }
        }
    }
    overlaps
}

/// A record of a single body grid validation.
#[derive(Debug, Clone)]
pub struct GridLayoutRecord {
    /// User-provided name for identification.
    pub name: String,
    /// Configured strategy.
    pub kind: BodyGridKind,
    /// Mode the validation ran in.
    pub mode: LayoutMode,
    /// Requested column count.
    pub column_count: u16,
    /// Resolved column count.
    pub grid_columns: u16,
    /// Resolved row count.
    pub grid_rows: u16,
    /// Grid data written to each candidate.
    pub placements: Vec<Placement>,
    /// Time taken to validate (if measured).
    pub solve_time: Option<Duration>,
}

impl GridLayoutRecord {
    /// Create a new, empty record.
    pub fn new(name: impl Into<String>, kind: BodyGridKind, mode: LayoutMode) -> Self {
        Self {
            name: name.into(),
            kind,
            mode,
            column_count: 0,
            grid_columns: 0,
            grid_rows: 0,
            placements: Vec::new(),
            solve_time: None,
        }
    }

    /// Field index pairs whose placements intersect.
    pub fn overlaps(&self) -> Vec<(usize, usize)> {
        let data: Vec<GridData> = self.placements.iter().map(|p| p.data).collect();
        find_overlaps(&data)
            .into_iter()
            .map(|(i, j)| (self.placements[i].field, self.placements[j].field))
            .collect()
    }

    /// Check if any two placements share a cell.
    pub fn has_overlap(&self) -> bool {
        !self.overlaps().is_empty()
    }

    /// Row count implied by the placements: the lowest bottom edge.
    pub fn expected_row_count(&self) -> u32 {
        self.placements.iter().map(|p| p.data.bottom()).max().unwrap_or(0)
    }

    /// Check if the reported row count disagrees with the placements.
    pub fn has_row_mismatch(&self) -> bool {
        u32::from(self.grid_rows) != self.expected_row_count()
    }

    /// Generate a human-readable summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "{} ({}, {}):",
            self.name,
            self.kind.as_str(),
            self.mode.as_str()
        );
        let _ = writeln!(
            s,
            "  Grid: {}x{} (requested {} columns)",
            self.grid_columns, self.grid_rows, self.column_count
        );
        for placement in &self.placements {
            let (x, y, w, h) = placement.data.rect();
            let _ = writeln!(s, "  [{}] ({x},{y} {w}x{h})", placement.field);
        }
        for (a, b) in self.overlaps() {
            let _ = writeln!(s, "  ⚠ OVERLAP [{a}] [{b}]");
        }
        if self.has_row_mismatch() {
            let _ = writeln!(
                s,
                "  ⚠ ROW COUNT {} (placements end at {})",
                self.grid_rows,
                self.expected_row_count()
            );
        }
        if let Some(t) = self.solve_time {
            let _ = writeln!(s, "  Solve time: {:?}", t);
        }
        s
    }
}

/// Collects [`GridLayoutRecord`]s from every body grid it is attached to.
///
/// One debugger is usually shared by all group boxes of a form, so nested
/// boxes show up in rebuild order (innermost first). Nothing is recorded
/// until it is enabled.
#[derive(Debug)]
pub struct LayoutDebugger {
    enabled: AtomicBool,
    records: Mutex<Vec<GridLayoutRecord>>,
}

impl LayoutDebugger {
    /// A disabled debugger, ready to be handed to several body grids.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            enabled: AtomicBool::new(false),
            records: Mutex::new(Vec::new()),
        })
    }

    /// Whether validations are currently recorded.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Flip recording; returns the new state.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::Relaxed)
    }

    /// Run `f` on the record list. `None` if a recording thread panicked.
    fn with_records<R>(&self, f: impl FnOnce(&mut Vec<GridLayoutRecord>) -> R) -> Option<R> {
        self.records.lock().ok().map(|mut records| f(&mut records))
    }

    /// Forget every recorded validation.
    pub fn clear(&self) {
        self.with_records(Vec::clear);
    }

    /// Store one validation; dropped while disabled.
    pub fn record(&self, record: GridLayoutRecord) {
        if self.enabled() {
            self.with_records(|records| records.push(record));
        }
    }

    /// Copy of the recorded validations, oldest first.
    pub fn snapshot(&self) -> Vec<GridLayoutRecord> {
        self.with_records(|records| records.clone()).unwrap_or_default()
    }

    fn records_where(&self, keep: impl Fn(&GridLayoutRecord) -> bool) -> Vec<GridLayoutRecord> {
        self.with_records(|records| records.iter().filter(|r| keep(r)).cloned().collect())
            .unwrap_or_default()
    }

    /// Validations that gave two fields a shared cell.
    pub fn overlapping(&self) -> Vec<GridLayoutRecord> {
        self.records_where(GridLayoutRecord::has_overlap)
    }

    /// Validations whose row count does not end at the lowest field.
    pub fn row_mismatches(&self) -> Vec<GridLayoutRecord> {
        self.records_where(GridLayoutRecord::has_row_mismatch)
    }

    /// Text report: a list of broken validations, then every summary.
    pub fn report(&self) -> String {
        let records = self.snapshot();

        let mut s = String::new();
        let _ = writeln!(s, "body grid: {} validations recorded", records.len());

        let broken: Vec<&str> = records
            .iter()
            .filter(|r| r.has_overlap() || r.has_row_mismatch())
            .map(|r| r.name.as_str())
            .collect();
        if !broken.is_empty() {
            let _ = writeln!(s, "⚠ broken: {}", broken.join(", "));
        }

        for record in &records {
            let _ = write!(s, "\n{}", record.summary());
        }
        s
    }

    /// Export all records as a JSON array.
    pub fn export_json(&self) -> serde_json::Value {
        let records: Vec<serde_json::Value> = self
            .snapshot()
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "kind": r.kind,
                    "mode": r.mode,
                    "column_count": r.column_count,
                    "grid_columns": r.grid_columns,
                    "grid_rows": r.grid_rows,
                    "placements": r.placements,
                    "overlaps": r.overlaps(),
                    "solve_time_us": r.solve_time.map(|t| u64::try_from(t.as_micros()).unwrap_or(u64::MAX)),
                })
            })
            .collect();
        serde_json::Value::Array(records)
    }
}
