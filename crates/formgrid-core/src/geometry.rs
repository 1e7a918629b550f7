#![forbid(unsafe_code)]

//! Logical grid geometry.
//!
//! Coordinates are grid units (columns and rows), not pixels. The origin is
//! the top-left cell of the owning group box body.
//!
//! Edges are exclusive and computed in `u32`, so a rectangle touching the
//! last representable row still reports its true bottom edge. Layout keeps
//! every edge at or below [`MAX_GRID_EDGE`]; see [`clamp_span`].

use serde::{Deserialize, Serialize};

/// Largest right or bottom edge a laid-out field may have.
///
/// Cells therefore have indices below `MAX_GRID_EDGE`, and row and column
/// counts always fit in a `u16`.
pub const MAX_GRID_EDGE: u16 = u16::MAX;

/// Shrink `span` so that `origin + span` stays within [`MAX_GRID_EDGE`].
///
/// Returns 0 when `origin` already sits on the last edge.
#[inline]
pub const fn clamp_span(origin: u16, span: u16) -> u16 {
    let room = MAX_GRID_EDGE - origin;
    if span < room { span } else { room }
}

/// A cell position in the logical grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column index.
    pub x: u16,
    /// Row index.
    pub y: u16,
}

impl GridPos {
    /// Create a new position.
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Horizontal alignment of a field inside its grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of a field inside its grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Resolved grid data of a field.
///
/// Written by the body grid once per validation. The positional part
/// (`x`, `y`, `w`, `h`) is absolute within the owning group box; the remaining
/// attributes are carried through from the field's hints for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridData {
    /// Left column (inclusive).
    pub x: u16,
    /// Top row (inclusive).
    pub y: u16,
    /// Column span.
    pub w: u16,
    /// Row span.
    pub h: u16,
    /// Horizontal grow weight; negative means "computed by the renderer".
    pub weight_x: f64,
    /// Vertical grow weight.
    pub weight_y: f64,
    pub use_ui_width: bool,
    pub use_ui_height: bool,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub fill_horizontal: bool,
    pub fill_vertical: bool,
}

impl Default for GridData {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: 1,
            h: 1,
            weight_x: -1.0,
            weight_y: 0.0,
            use_ui_width: false,
            use_ui_height: false,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            fill_horizontal: true,
            fill_vertical: true,
        }
    }
}

impl GridData {
    /// Grid data with the given rectangle and default attributes.
    #[inline]
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self {
            x,
            y,
            w,
            h,
            ..Self::default()
        }
    }

    /// Replace the positional part, keeping every other attribute.
    #[must_use]
    pub fn with_rect(mut self, x: u16, y: u16, w: u16, h: u16) -> Self {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        self
    }

    /// The `(x, y, w, h)` tuple.
    #[inline]
    pub const fn rect(&self) -> (u16, u16, u16, u16) {
        (self.x, self.y, self.w, self.h)
    }

    /// Top-left position.
    #[inline]
    pub const fn origin(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.w as u32
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.h as u32
    }

    /// Shrink the spans so both edges stay within [`MAX_GRID_EDGE`].
    #[must_use]
    pub const fn clamped(mut self) -> Self {
        self.w = clamp_span(self.x, self.w);
        self.h = clamp_span(self.y, self.h);
        self
    }

    /// Check if the rectangle covers zero cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Check if a cell is covered by this rectangle.
    #[inline]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= self.x
            && (pos.x as u32) < self.right()
            && pos.y >= self.y
            && (pos.y as u32) < self.bottom()
    }

    /// Check whether two rectangles share at least one cell.
    pub fn intersects(&self, other: &GridData) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        u32::from(self.x.max(other.x)) < self.right().min(other.right())
            && u32::from(self.y.max(other.y)) < self.bottom().min(other.bottom())
    }

    /// Iterate the representable cells covered by this rectangle in
    /// row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        let rows = (u32::from(self.y)..self.bottom()).filter_map(|y| u16::try_from(y).ok());
        rows.flat_map(move |y| {
            (u32::from(self.x)..self.right())
                .filter_map(|x| u16::try_from(x).ok())
                .map(move |x| GridPos::new(x, y))
        })
    }
}
