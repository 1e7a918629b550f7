#![forbid(unsafe_code)]

//! Core: logical grid geometry and per-field grid hints.
//!
//! # Role in FormGrid
//! `formgrid-core` holds the value types shared by every layer: the resolved
//! [`GridData`](geometry::GridData) a field ends up with, the
//! [`GridDataHints`](hints::GridDataHints) a field is configured with, and the
//! [`FieldRole`](hints::FieldRole) tag that routes process buttons away from
//! the body grid.
//!
//! # How it fits in the system
//! `formgrid-layout` consumes hints and produces grid data. Nothing in this
//! crate performs layout; all types are plain data with cheap geometry helpers.

pub mod geometry;
pub mod hints;

pub use geometry::{
    GridData, GridPos, HorizontalAlignment, MAX_GRID_EDGE, VerticalAlignment, clamp_span,
};
pub use hints::{FULL_WIDTH, FieldRole, GridDataHints};
