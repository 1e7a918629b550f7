#![forbid(unsafe_code)]

//! Grid hints: how a field asks to be placed.
//!
//! Hints are configuration, never layout output. A body grid reads them on
//! every validation and writes the result into a separate
//! [`GridData`](crate::GridData).
//!
//! # Conventions
//!
//! - `x`/`y` of `None` means "unpositioned". A field only keeps its position
//!   when every sibling in the group box is positioned too.
//! - `w == FULL_WIDTH` spans every column of the owning group box.
//! - `h == 0` is treated as a single row.
//! - `weight_x`/`weight_y` of `None` are computed during resolution.

use serde::{Deserialize, Serialize};

use crate::geometry::{HorizontalAlignment, VerticalAlignment};

/// Column span meaning "as wide as the owning group box".
pub const FULL_WIDTH: u16 = 0;

/// What a field is to the body grid.
///
/// Decided once by whoever builds the field model; the layout engine never
/// inspects field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// A regular field placed on the body grid.
    #[default]
    Control,
    /// An OK/Cancel style button, laid out in the button bar instead.
    ProcessButton,
}

/// Requested placement and layout attributes of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDataHints {
    pub x: Option<u16>,
    pub y: Option<u16>,
    /// Column span, or [`FULL_WIDTH`].
    pub w: u16,
    /// Row span.
    pub h: u16,
    pub weight_x: Option<f64>,
    pub weight_y: Option<f64>,
    pub use_ui_width: bool,
    pub use_ui_height: bool,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub fill_horizontal: bool,
    pub fill_vertical: bool,
}

impl Default for GridDataHints {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            w: 1,
            h: 1,
            weight_x: None,
            weight_y: None,
            use_ui_width: false,
            use_ui_height: false,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            fill_horizontal: true,
            fill_vertical: true,
        }
    }
}

impl GridDataHints {
    /// Single-cell, unpositioned hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints with the given span and no position.
    #[must_use]
    pub fn sized(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            ..Self::default()
        }
    }

    /// Full-width hints spanning `h` rows.
    #[must_use]
    pub fn full_width(h: u16) -> Self {
        Self::sized(FULL_WIDTH, h)
    }

    /// Set an explicit position.
    #[must_use]
    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the column and row span.
    #[must_use]
    pub fn span(mut self, w: u16, h: u16) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    #[must_use]
    pub fn weight_x(mut self, weight: f64) -> Self {
        self.weight_x = Some(weight);
        self
    }

    #[must_use]
    pub fn weight_y(mut self, weight: f64) -> Self {
        self.weight_y = Some(weight);
        self
    }

    #[must_use]
    pub fn use_ui_height(mut self, use_ui_height: bool) -> Self {
        self.use_ui_height = use_ui_height;
        self
    }

    #[must_use]
    pub fn alignment(mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self
    }

    /// Whether both `x` and `y` are set.
    #[inline]
    pub const fn is_positioned(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// Whether the field asks to span all columns.
    #[inline]
    pub const fn is_full_width(&self) -> bool {
        self.w == FULL_WIDTH
    }

    /// Row span with the zero-height clamp applied.
    #[inline]
    pub fn effective_h(&self) -> u16 {
        self.h.max(1)
    }
}
