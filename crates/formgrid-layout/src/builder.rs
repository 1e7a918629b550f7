//! Resolution of grid hints into grid data.
//!
//! Every placement path starts here: the builder turns a field's hints into
//! a [`GridData`] sized against a reference column count, and the strategies
//! then overwrite the position.

use formgrid_core::{GridData, GridDataHints};

use crate::field::GridField;

/// Builds [`GridData`] from [`GridDataHints`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GridDataBuilder;

impl GridDataBuilder {
    /// Resolve a field's hints against `column_count`.
    pub fn from_hints<F: GridField + ?Sized>(field: &F, column_count: u16) -> GridData {
        Self::resolve(&field.grid_data_hints(), field.inherited_weight_y(), column_count)
    }

    /// Resolve raw hints.
    ///
    /// - `FULL_WIDTH` becomes `column_count`; wider spans are kept.
    /// - A zero row span becomes 1.
    /// - Unset positions become 0.
    /// - An unset `weight_y` takes `inherited_weight_y` when given, else 1 for
    ///   fields spanning two or more rows and 0 otherwise.
    /// - An unset `weight_x` stays negative (computed by the renderer).
    pub fn resolve(hints: &GridDataHints, inherited_weight_y: Option<f64>, column_count: u16) -> GridData {
        let w = if hints.is_full_width() {
            column_count.max(1)
        } else {
            hints.w
        };
        let h = hints.effective_h();
        let weight_y = hints
            .weight_y
            .or(inherited_weight_y)
            .unwrap_or(if h >= 2 { 1.0 } else { 0.0 });

        GridData {
            x: hints.x.unwrap_or(0),
            y: hints.y.unwrap_or(0),
            w,
            h,
            weight_x: hints.weight_x.unwrap_or(-1.0),
            weight_y,
            use_ui_width: hints.use_ui_width,
            use_ui_height: hints.use_ui_height,
            horizontal_alignment: hints.horizontal_alignment,
            vertical_alignment: hints.vertical_alignment,
            fill_horizontal: hints.fill_horizontal,
            fill_vertical: hints.fill_vertical,
        }
    }

    /// Grid data for a hidden field: its hints collapsed to a single column.
    pub fn placeholder<F: GridField + ?Sized>(field: &F) -> GridData {
        let mut data = Self::from_hints(field, 1);
        data.w = 1;
        data
    }
}
