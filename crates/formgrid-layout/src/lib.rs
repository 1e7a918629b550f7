#![forbid(unsafe_code)]

//! Body grid solvers for group boxes.
//!
//! A [`GroupBox`] places its fields on a logical grid of columns and rows.
//! Each validation classifies the fields, picks a [`LayoutMode`] and, for
//! dynamic layouts, runs the configured [`BodyGridKind`]:
//!
//! - [`BodyGridKind::Horizontal`]: row-major flow with wraparound
//!   ([`horizontal`]).
//! - [`BodyGridKind::Vertical`]: column-major stacks split into balanced
//!   columns, with full-width fields as breaks ([`vertical`]).
//!
//! The result is written back onto every field as [`GridData`].

pub mod body_grid;
pub mod builder;
pub mod config;
pub mod debug;
pub mod error;
pub mod field;
pub mod group_box;
pub mod horizontal;
pub mod vertical;

pub use body_grid::{BodyGrid, BodyGridKind, Classification, LayoutMode, Placement, classify};
pub use builder::GridDataBuilder;
pub use config::BodyGridConfig;
pub use debug::{GridLayoutRecord, LayoutDebugger, find_overlaps};
pub use error::{GridConfigError, GridStructureError};
pub use field::{FormField, GridField};
pub use group_box::{DEFAULT_GRID_COLUMN_COUNT, GroupBox, resolve_column_count, resolve_column_count_or};
pub use horizontal::{HorizontalGridMatrix, MatrixCell};
pub use vertical::{CellArena, CellId, Extent, GridCell, MainChain, VerticalGridBuilder};

pub use formgrid_core::{
    FULL_WIDTH, FieldRole, GridData, GridDataHints, GridPos, HorizontalAlignment, MAX_GRID_EDGE,
    VerticalAlignment,
};
