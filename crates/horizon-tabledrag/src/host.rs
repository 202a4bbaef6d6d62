//! The capability contract between the drag core and its host.
//!
//! The core never touches the host's UI tree directly. Everything it needs
//! from the environment is expressed through [`TableEnvironment`]: element
//! geometry for pointer math, pointer capture for the lifetime of an active
//! gesture, visual state application, viewport scrolling, and structural
//! mirroring of row moves and indent changes.
//!
//! Only the geometry queries are required. The remaining methods default to
//! no-ops so that headless hosts (and tests) can implement the trait with a
//! few lines; a rendering host overrides them to keep its element tree in
//! sync with the core's row order.

use crate::types::{Point, Size};

/// Opaque handle to a host UI element (a table, a row, or a cell).
///
/// The core never interprets the value; it only passes handles back to the
/// environment. Hosts typically map these to DOM node ids, widget ids, or
/// slot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Create an ElementId from a raw u64 value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Convert the ElementId to a raw u64 value.
    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Visual treatment for a row, as a named class and/or an inline style map.
///
/// Which representation the host honors is its own business; the core only
/// forwards whichever parts are present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowStyle {
    /// A class name to toggle on the row element.
    pub class: Option<String>,
    /// Inline style properties to apply, as (property, value) pairs.
    pub styles: Vec<(String, String)>,
}

impl RowStyle {
    /// A style consisting of a single class name.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            class: Some(name.into()),
            styles: Vec::new(),
        }
    }

    /// A style consisting of inline properties only.
    pub fn styles(styles: Vec<(String, String)>) -> Self {
        Self {
            class: None,
            styles,
        }
    }

    /// True if this style carries nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.styles.is_empty()
    }
}

/// Capabilities the drag core requires from its host environment.
///
/// All calls happen synchronously inside the pointer event that triggered
/// them; implementations must not re-enter the manager from these methods.
pub trait TableEnvironment {
    /// The element whose coordinate space `element`'s offset is relative
    /// to, or `None` for a root element.
    fn offset_parent(&self, element: ElementId) -> Option<ElementId>;

    /// The offset of `element` within its offset parent.
    fn offset_in_parent(&self, element: ElementId) -> Point;

    /// The rendered size of `element`.
    fn size_of(&self, element: ElementId) -> Size;

    /// The first child of `element`, if any. Used as the measurement
    /// fallback for degenerate zero-height rows.
    fn first_child(&self, element: ElementId) -> Option<ElementId>;

    /// Begin routing document-level move/end events for the active gesture
    /// on `table` into the manager. Paired with [`end_pointer_capture`];
    /// the core guarantees the pair is balanced on every gesture exit path.
    ///
    /// [`end_pointer_capture`]: TableEnvironment::end_pointer_capture
    fn begin_pointer_capture(&mut self, table: ElementId) {
        let _ = table;
    }

    /// Stop routing move/end events for `table`.
    fn end_pointer_capture(&mut self, table: ElementId) {
        let _ = table;
    }

    /// Apply a visual treatment to a row element.
    fn apply_row_style(&mut self, row: ElementId, style: &RowStyle) {
        let _ = (row, style);
    }

    /// Remove a previously applied visual treatment from a row element.
    fn clear_row_style(&mut self, row: ElementId, style: &RowStyle) {
        let _ = (row, style);
    }

    /// Current viewport scroll offset.
    fn scroll_offset(&self) -> Point {
        Point::ZERO
    }

    /// Current viewport size.
    fn viewport_size(&self) -> Size {
        Size::ZERO
    }

    /// Scroll the viewport by a delta.
    fn scroll_by(&mut self, delta: Point) {
        let _ = delta;
    }

    /// Mirror a structural move: place `row` immediately before `target`
    /// within the same container.
    fn move_row_before(&mut self, row: ElementId, target: ElementId) {
        let _ = (row, target);
    }

    /// Mirror a structural move: place `row` immediately after `target`
    /// within the same container.
    fn move_row_after(&mut self, row: ElementId, target: ElementId) {
        let _ = (row, target);
    }

    /// Mirror an indent change: set the number of nesting units shown for
    /// `row`.
    fn set_indent_units(&mut self, row: ElementId, count: usize) {
        let _ = (row, count);
    }
}
