//! The field side of the body grid contract.
//!
//! A body grid only ever talks to fields through [`GridField`]. [`FormField`]
//! is the concrete model used by [`GroupBox`](crate::GroupBox); hosts with
//! their own field types implement the trait directly.

use formgrid_core::{FieldRole, GridData, GridDataHints};

use crate::group_box::GroupBox;

/// A field as seen by a body grid.
pub trait GridField {
    /// Whether the field is displayed.
    fn is_visible(&self) -> bool;

    /// Control or process button.
    fn role(&self) -> FieldRole;

    /// The configured hints. Read on every validation.
    fn grid_data_hints(&self) -> GridDataHints;

    /// Store the resolved grid data.
    fn set_grid_data(&mut self, data: GridData);

    /// Vertical weight derived from the field's own content.
    ///
    /// Containers return `Some` so an unset `weight_y` hint follows their
    /// children; plain fields keep the default `None`.
    fn inherited_weight_y(&self) -> Option<f64> {
        None
    }
}

/// A form field with grid hints and an optional nested group box.
#[derive(Debug, Clone)]
pub struct FormField {
    label: String,
    role: FieldRole,
    visible: bool,
    hints: GridDataHints,
    grid_data: GridData,
    group_box: Option<Box<GroupBox>>,
}

impl FormField {
    /// A visible control with default single-cell hints.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            role: FieldRole::Control,
            visible: true,
            hints: GridDataHints::default(),
            grid_data: GridData::default(),
            group_box: None,
        }
    }

    /// A visible process button.
    pub fn process_button(label: impl Into<String>) -> Self {
        Self::new(label).with_role(FieldRole::ProcessButton)
    }

    /// A field hosting a nested group box.
    ///
    /// Group boxes span the full width of their parent unless told otherwise.
    pub fn group(label: impl Into<String>, group_box: GroupBox) -> Self {
        Self {
            hints: GridDataHints::full_width(1),
            group_box: Some(Box::new(group_box)),
            ..Self::new(label)
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: FieldRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: GridDataHints) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn hints(&self) -> &GridDataHints {
        &self.hints
    }

    /// Replace the hints. Takes effect on the next grid rebuild.
    pub fn set_hints(&mut self, hints: GridDataHints) {
        self.hints = hints;
    }

    /// Show or hide the field. Takes effect on the next grid rebuild.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The grid data written by the last rebuild of the owning group box.
    pub fn grid_data(&self) -> &GridData {
        &self.grid_data
    }

    pub fn group_box(&self) -> Option<&GroupBox> {
        self.group_box.as_deref()
    }

    pub fn group_box_mut(&mut self) -> Option<&mut GroupBox> {
        self.group_box.as_deref_mut()
    }
}

impl GridField for FormField {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn role(&self) -> FieldRole {
        self.role
    }

    fn grid_data_hints(&self) -> GridDataHints {
        self.hints
    }

    fn set_grid_data(&mut self, data: GridData) {
        self.grid_data = data;
    }

    fn inherited_weight_y(&self) -> Option<f64> {
        let group_box = self.group_box.as_deref()?;
        let grows = group_box
            .fields()
            .iter()
            .filter(|f| f.visible && f.role == FieldRole::Control)
            .any(|f| f.grid_data.weight_y > 0.0);
        Some(if grows { 1.0 } else { 0.0 })
    }
}
