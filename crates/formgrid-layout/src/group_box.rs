#![forbid(unsafe_code)]

//! Group boxes: ordered fields plus the body grid that places them.
//!
//! A group box owns its fields, may host nested group boxes through
//! [`FormField::group`], and resolves its column count from its own hint or
//! the nearest ancestor that sets one.
//!
//! # Invariants
//!
//! 1. Nested group boxes are rebuilt before their parent, so a parent sees
//!    its children's final grid data when it derives inherited weights.
//! 2. The ancestor chain is passed down explicitly; a group box never holds
//!    a reference to its parent.
//! 3. Rebuilding twice without changes yields identical grid data.
//!
//! # Failure Modes
//!
//! None. A column count hint of 0 ends the walk up the chain like any other
//! hint; the strategies lay it out as a single column.

use std::sync::Arc;

use crate::body_grid::{BodyGrid, BodyGridKind};
use crate::config::BodyGridConfig;
use crate::debug::LayoutDebugger;
use crate::field::FormField;

/// Column count used when no group box in the chain sets one.
pub const DEFAULT_GRID_COLUMN_COUNT: u16 = 2;

/// Resolve a column count from hints ordered innermost first.
///
/// The first set hint wins, 0 included; otherwise
/// [`DEFAULT_GRID_COLUMN_COUNT`].
pub fn resolve_column_count(chain: &[Option<u16>]) -> u16 {
    resolve_column_count_or(chain, DEFAULT_GRID_COLUMN_COUNT)
}

/// Like [`resolve_column_count`] with an explicit fallback (at least 1).
pub fn resolve_column_count_or(chain: &[Option<u16>], default: u16) -> u16 {
    chain
        .iter()
        .flatten()
        .copied()
        .next()
        .unwrap_or(default.max(1))
}

/// The owner of a body grid.
#[derive(Debug, Clone)]
pub struct GroupBox {
    fields: Vec<FormField>,
    grid_column_count: Option<u16>,
    default_column_count: u16,
    body_grid: BodyGrid,
}

impl Default for GroupBox {
    fn default() -> Self {
        Self::with_config(BodyGridConfig::default())
    }
}

impl GroupBox {
    /// An empty group box with a vertical body grid that inherits its
    /// column count.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BodyGridConfig) -> Self {
        Self {
            fields: Vec::new(),
            grid_column_count: None,
            default_column_count: config.default_column_count.max(1),
            body_grid: BodyGrid::new(config.kind),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FormField>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[must_use]
    pub fn with_grid_column_count(mut self, columns: Option<u16>) -> Self {
        self.grid_column_count = columns;
        self
    }

    #[must_use]
    pub fn with_body_grid(mut self, kind: BodyGridKind) -> Self {
        self.body_grid.set_kind(kind);
        self
    }

    /// Record this box's validations under `name`.
    #[must_use]
    pub fn with_debugger(mut self, name: impl Into<String>, debugger: Arc<LayoutDebugger>) -> Self {
        self.body_grid.set_debugger(name, debugger);
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [FormField] {
        &mut self.fields
    }

    pub fn push_field(&mut self, field: FormField) {
        self.fields.push(field);
    }

    /// First field labelled `label`: direct children, then nested group
    /// boxes depth-first.
    pub fn field(&self, label: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.label() == label).or_else(|| {
            self.fields
                .iter()
                .filter_map(FormField::group_box)
                .find_map(|group_box| group_box.field(label))
        })
    }

    pub fn field_mut(&mut self, label: &str) -> Option<&mut FormField> {
        if let Some(index) = self.fields.iter().position(|f| f.label() == label) {
            return self.fields.get_mut(index);
        }
        self.fields
            .iter_mut()
            .filter_map(FormField::group_box_mut)
            .find_map(|group_box| group_box.field_mut(label))
    }

    /// The configured column count hint; `None` inherits.
    #[inline]
    pub fn grid_column_count_hint(&self) -> Option<u16> {
        self.grid_column_count
    }

    /// Change the column count hint and rebuild.
    pub fn set_grid_column_count(&mut self, columns: Option<u16>) {
        self.grid_column_count = columns;
        self.rebuild_field_grid();
    }

    /// Change the body grid strategy and rebuild.
    pub fn set_body_grid(&mut self, kind: BodyGridKind) {
        self.body_grid.set_kind(kind);
        self.rebuild_field_grid();
    }

    pub fn body_grid(&self) -> &BodyGrid {
        &self.body_grid
    }

    /// Resolved columns of the last rebuild.
    #[inline]
    pub fn grid_column_count(&self) -> u16 {
        self.body_grid.grid_column_count()
    }

    /// Resolved rows of the last rebuild.
    #[inline]
    pub fn grid_row_count(&self) -> u16 {
        self.body_grid.grid_row_count()
    }

    /// Rebuild as a root group box.
    pub fn rebuild_field_grid(&mut self) {
        self.rebuild_field_grid_within(&[]);
    }

    /// Rebuild below `ancestors`, the column count hints of the enclosing
    /// group boxes ordered outermost first.
    pub fn rebuild_field_grid_within(&mut self, ancestors: &[Option<u16>]) {
        let mut chain = Vec::with_capacity(ancestors.len() + 1);
        chain.extend_from_slice(ancestors);
        chain.push(self.grid_column_count);

        for field in &mut self.fields {
            if let Some(group_box) = field.group_box_mut() {
                group_box.rebuild_field_grid_within(&chain);
            }
        }

        chain.reverse();
        let columns = resolve_column_count_or(&chain, self.default_column_count);
        self.body_grid.validate(&mut self.fields, columns);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "group_box.rebuild",
            depth = ancestors.len(),
            hint = ?self.grid_column_count,
            columns,
            grid_columns = self.grid_column_count(),
            grid_rows = self.grid_row_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgrid_core::GridDataHints;

    fn rect(group_box: &GroupBox, label: &str) -> (u16, u16, u16, u16) {
        group_box.field(label).map(|f| f.grid_data().rect()).unwrap()
    }

    #[test]
    fn resolve_first_hint_wins() {
        assert_eq!(resolve_column_count(&[None, Some(3), Some(1)]), 3);
        assert_eq!(resolve_column_count(&[Some(1), Some(3)]), 1);
    }

    #[test]
    fn resolve_defaults_when_unset() {
        assert_eq!(resolve_column_count(&[]), DEFAULT_GRID_COLUMN_COUNT);
        assert_eq!(resolve_column_count(&[None, None]), 2);
    }

    #[test]
    fn resolve_stops_at_zero() {
        assert_eq!(resolve_column_count(&[None, Some(0), Some(4)]), 0);
        assert_eq!(resolve_column_count_or(&[], 0), 1);
    }

    #[test]
    fn zero_hint_is_not_overridden_by_parent() {
        let inner = GroupBox::new()
            .with_grid_column_count(Some(0))
            .with_fields((0..3).map(|i| FormField::new(format!("i{i}"))));
        let mut outer = GroupBox::new()
            .with_grid_column_count(Some(3))
            .with_field(FormField::group("inner", inner));
        outer.rebuild_field_grid();

        let inner = outer.field("inner").and_then(FormField::group_box).unwrap();
        assert_eq!(inner.grid_column_count(), 1);
        assert_eq!(inner.grid_row_count(), 3);
        assert_eq!(rect(&outer, "i2"), (0, 2, 1, 1));
    }

    #[test]
    fn default_box_is_vertical_two_columns() {
        let mut group_box = GroupBox::new()
            .with_field(FormField::new("a"))
            .with_field(FormField::new("b"));
        group_box.rebuild_field_grid();
        assert_eq!(group_box.body_grid().kind(), BodyGridKind::Vertical);
        assert_eq!(group_box.grid_column_count(), 2);
        assert_eq!(group_box.grid_row_count(), 1);
        assert_eq!(rect(&group_box, "a"), (0, 0, 1, 1));
        assert_eq!(rect(&group_box, "b"), (1, 0, 1, 1));
    }

    #[test]
    fn config_sets_kind_and_default_columns() {
        let config = BodyGridConfig {
            kind: BodyGridKind::Horizontal,
            default_column_count: 3,
        };
        let mut group_box =
            GroupBox::with_config(config).with_fields((0..4).map(|i| FormField::new(format!("f{i}"))));
        group_box.rebuild_field_grid();
        assert_eq!(group_box.grid_column_count(), 3);
        assert_eq!(rect(&group_box, "f3"), (0, 1, 1, 1));
    }

    #[test]
    fn nested_box_inherits_parent_columns() {
        let inner = GroupBox::new().with_fields((0..3).map(|i| FormField::new(format!("i{i}"))));
        let mut outer = GroupBox::new()
            .with_grid_column_count(Some(3))
            .with_field(FormField::group("inner", inner));
        outer.rebuild_field_grid();

        let inner = outer.field("inner").and_then(FormField::group_box).unwrap();
        assert_eq!(inner.grid_column_count(), 3);
        assert_eq!(inner.grid_row_count(), 1);
        assert_eq!(rect(&outer, "i2"), (2, 0, 1, 1));
        assert_eq!(rect(&outer, "inner"), (0, 0, 3, 1));
    }

    #[test]
    fn nested_hint_overrides_parent() {
        let inner = GroupBox::new()
            .with_grid_column_count(Some(1))
            .with_fields((0..2).map(|i| FormField::new(format!("i{i}"))));
        let mut outer = GroupBox::new()
            .with_grid_column_count(Some(4))
            .with_field(FormField::group("inner", inner));
        outer.rebuild_field_grid();

        assert_eq!(rect(&outer, "i0"), (0, 0, 1, 1));
        assert_eq!(rect(&outer, "i1"), (0, 1, 1, 1));
    }

    #[test]
    fn nested_box_weight_follows_children() {
        let inner = GroupBox::new().with_field(FormField::new("memo").with_hints(GridDataHints::sized(1, 3)));
        let mut outer = GroupBox::new().with_field(FormField::group("inner", inner));
        outer.rebuild_field_grid();
        assert_eq!(outer.field("inner").unwrap().grid_data().weight_y, 1.0);
    }

    #[test]
    fn set_grid_column_count_rebuilds() {
        let mut group_box = GroupBox::new().with_fields((0..3).map(|i| FormField::new(format!("f{i}"))));
        group_box.rebuild_field_grid();
        assert_eq!(group_box.grid_column_count(), 2);

        group_box.set_grid_column_count(Some(3));
        assert_eq!(group_box.grid_column_count(), 3);
        assert_eq!(group_box.grid_row_count(), 1);
    }

    #[test]
    fn set_body_grid_rebuilds() {
        let mut group_box = GroupBox::new().with_fields((0..3).map(|i| FormField::new(format!("f{i}"))));
        group_box.rebuild_field_grid();
        // Vertical: f0,f1 in column 0, f2 in column 1.
        assert_eq!(rect(&group_box, "f1"), (0, 1, 1, 1));

        group_box.set_body_grid(BodyGridKind::Horizontal);
        assert_eq!(rect(&group_box, "f1"), (1, 0, 1, 1));
    }

    #[test]
    fn field_mut_reaches_nested_fields() {
        let inner = GroupBox::new().with_field(FormField::new("deep"));
        let mut outer = GroupBox::new().with_field(FormField::group("inner", inner));
        outer.field_mut("deep").unwrap().set_visible(false);
        outer.rebuild_field_grid();

        let inner = outer.field("inner").and_then(FormField::group_box).unwrap();
        assert_eq!(inner.grid_row_count(), 0);
        assert!(outer.field("missing").is_none());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut group_box = GroupBox::new().with_fields([
            FormField::new("a").with_hints(GridDataHints::sized(1, 2)),
            FormField::new("b"),
            FormField::new("c").with_hints(GridDataHints::full_width(1)),
        ]);
        group_box.rebuild_field_grid();
        let first: Vec<_> = group_box.fields().iter().map(|f| *f.grid_data()).collect();
        group_box.rebuild_field_grid();
        let second: Vec<_> = group_box.fields().iter().map(|f| *f.grid_data()).collect();
        assert_eq!(first, second);
    }
}
