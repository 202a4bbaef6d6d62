//! Row and table data model.
//!
//! A table is a flat ordered sequence of rows; the hierarchy is implied by
//! each row's indent level together with its position. There is no
//! parent-pointer graph to keep consistent while rows move around; nested
//! views are derived by a linear pass when needed (see
//! [`crate::serialize`]).

use std::hash::{Hash, Hasher};

use ahash::AHasher;

use crate::config::DragConfig;
use crate::host::ElementId;

/// One row of a draggable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Host element handle for geometry queries and visual mirroring.
    pub element: ElementId,
    /// Identifier used by serialization. Rows without one can still be
    /// dragged but are skipped when serializing.
    pub id: Option<String>,
    /// Nesting depth. 0 is top-level.
    pub indent: usize,
    /// Excluded from drag initiation.
    pub no_drag: bool,
    /// Excluded from drop-target eligibility.
    pub no_drop: bool,
}

impl Row {
    /// Create a top-level, draggable row.
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            id: None,
            indent: 0,
            no_drag: false,
            no_drop: false,
        }
    }

    /// Set the serialization id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial nesting depth.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Exclude the row from drag initiation.
    pub fn with_no_drag(mut self) -> Self {
        self.no_drag = true;
        self
    }

    /// Exclude the row from drop-target eligibility.
    pub fn with_no_drop(mut self) -> Self {
        self.no_drop = true;
        self
    }
}

/// An ordered sequence of rows with a drag configuration.
///
/// Row order is meaningful and mutable; it changes live while a drag is in
/// progress. The `id` is required for serialization only, never for
/// dragging.
#[derive(Debug, Clone)]
pub struct Table {
    element: ElementId,
    id: Option<String>,
    rows: Vec<Row>,
    config: DragConfig,
}

impl Table {
    /// Create an empty table with a default configuration.
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            id: None,
            rows: Vec::new(),
            config: DragConfig::default(),
        }
    }

    /// Set the table id used for serialization.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: DragConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the row sequence.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// The host element handle of the row container.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The table id, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The table's configuration.
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// The rows in their current order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Replace all rows.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Index of the row owning `element`, if present.
    pub fn row_index_of(&self, element: ElementId) -> Option<usize> {
        self.rows.iter().position(|r| r.element == element)
    }

    /// Move the row at `from` immediately before the row at `target`.
    pub(crate) fn move_row_before(&mut self, from: usize, target: usize) {
        if from == target {
            return;
        }
        let row = self.rows.remove(from);
        let target = if from < target { target - 1 } else { target };
        self.rows.insert(target, row);
    }

    /// Move the row at `from` immediately after the row at `target`.
    pub(crate) fn move_row_after(&mut self, from: usize, target: usize) {
        if from == target {
            return;
        }
        let row = self.rows.remove(from);
        let target = if from < target { target - 1 } else { target };
        self.rows.insert(target + 1, row);
    }

    /// Content hash over the full row order and indent levels.
    ///
    /// Captured at drag start and compared at drop to decide whether
    /// anything actually changed; it covers both reordering and hierarchy
    /// edits.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = AHasher::default();
        for row in &self.rows {
            row.id.hash(&mut hasher);
            row.indent.hash(&mut hasher);
        }
        hasher.finish()
    }
}
