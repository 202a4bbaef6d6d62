//! Per-table drag configuration.
//!
//! Configuration is an explicit struct with defined defaults, validated
//! once when a table is attached to the manager. Callback hooks are
//! injected strategy functions invoked synchronously at state-machine
//! transitions; they follow the same `Arc<dyn Fn>` alias pattern the rest
//! of the framework uses for extractors.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::host::RowStyle;
use crate::table::{Row, Table};

/// Default move-sensitivity threshold in pixels.
///
/// Pointer motion below this on an axis is treated as jitter.
pub const DEFAULT_SENSITIVITY: f32 = 10.0;

/// Default scroll increment in pixels for edge auto-scrolling.
pub const DEFAULT_SCROLL_AMOUNT: f32 = 5.0;

/// Default id-extraction pattern: the trailing segment after the last `-`.
///
/// Row ids commonly look like `item-42`; serialization wants the `42`.
pub const DEFAULT_SERIALIZE_PATTERN: &str = r"[^\-]*$";

/// Default class applied to a row while it is being dragged.
pub const DEFAULT_DRAG_CLASS: &str = "tabledrag-dragging";

/// Hook invoked when a drag session starts: `(table, dragged row index)`.
pub type DragStartHook = Arc<dyn Fn(&Table, usize) + Send + Sync>;

/// Hook invoked when a drop changed the table: `(table, dropped row index)`.
pub type DropHook = Arc<dyn Fn(&Table, usize) + Send + Sync>;

/// Hook consulted per drop-target candidate: `(dragged row, candidate)`.
/// Returning false excludes the candidate.
pub type AllowDropHook = Arc<dyn Fn(&Row, &Row) -> bool + Send + Sync>;

/// Configuration for one draggable table.
#[derive(Clone)]
pub struct DragConfig {
    /// Selector for a drag handle within each row. When set, only presses
    /// the host resolves as within-handle start a drag; otherwise any cell
    /// of the row qualifies.
    pub drag_handle: Option<String>,
    /// Visual treatment applied to the row while dragging.
    pub drag_style: RowStyle,
    /// Visual treatment applied to the row when dropped.
    pub drop_style: RowStyle,
    /// Scroll increment for edge auto-scrolling.
    pub scroll_amount: f32,
    /// Move-sensitivity threshold fed to the direction filter.
    pub sensitivity: f32,
    /// Maximum hierarchy depth. 0 disables hierarchy editing entirely.
    pub max_indent: usize,
    /// Repair hierarchy invariants after each drop.
    pub auto_clean: bool,
    /// Regex applied to raw row ids before serialization; the first match
    /// is the extracted id.
    pub serialize_pattern: String,
    /// Overrides the table id as the root serialization key.
    pub serialize_param: Option<String>,
    /// Reproduce the origin's flat-mode serialization, where the bucket
    /// key advances to the last appended id after each append. Off by
    /// default; see DESIGN.md for the compatibility rationale.
    pub chain_flat_keys: bool,
    /// Invoked when a drag session starts.
    pub on_drag_start: Option<DragStartHook>,
    /// Invoked when a drop changed row order or hierarchy.
    pub on_drop: Option<DropHook>,
    /// Consulted before a row may become a drop target.
    pub on_allow_drop: Option<AllowDropHook>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_handle: None,
            drag_style: RowStyle::class(DEFAULT_DRAG_CLASS),
            drop_style: RowStyle::default(),
            scroll_amount: DEFAULT_SCROLL_AMOUNT,
            sensitivity: DEFAULT_SENSITIVITY,
            max_indent: 0,
            auto_clean: true,
            serialize_pattern: DEFAULT_SERIALIZE_PATTERN.to_string(),
            serialize_param: None,
            chain_flat_keys: false,
            on_drag_start: None,
            on_drop: None,
            on_allow_drop: None,
        }
    }
}

impl DragConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict drag initiation to a handle selector.
    pub fn with_drag_handle(mut self, selector: impl Into<String>) -> Self {
        self.drag_handle = Some(selector.into());
        self
    }

    /// Set the visual treatment applied while dragging.
    pub fn with_drag_style(mut self, style: RowStyle) -> Self {
        self.drag_style = style;
        self
    }

    /// Set the visual treatment applied on drop.
    pub fn with_drop_style(mut self, style: RowStyle) -> Self {
        self.drop_style = style;
        self
    }

    /// Set the edge auto-scroll increment.
    pub fn with_scroll_amount(mut self, amount: f32) -> Self {
        self.scroll_amount = amount;
        self
    }

    /// Set the move-sensitivity threshold.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Enable hierarchy editing up to `depth` levels. 0 disables it.
    pub fn with_max_indent(mut self, depth: usize) -> Self {
        self.max_indent = depth;
        self
    }

    /// Enable or disable the post-drop hierarchy repair pass.
    pub fn with_auto_clean(mut self, auto_clean: bool) -> Self {
        self.auto_clean = auto_clean;
        self
    }

    /// Set the id-extraction pattern used by serialization.
    pub fn with_serialize_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.serialize_pattern = pattern.into();
        self
    }

    /// Override the root serialization key.
    pub fn with_serialize_param(mut self, param: impl Into<String>) -> Self {
        self.serialize_param = Some(param.into());
        self
    }

    /// Enable origin-compatible flat-mode key chaining.
    pub fn with_chain_flat_keys(mut self, chain: bool) -> Self {
        self.chain_flat_keys = chain;
        self
    }

    /// Set the drag-start hook.
    pub fn with_on_drag_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Table, usize) + Send + Sync + 'static,
    {
        self.on_drag_start = Some(Arc::new(hook));
        self
    }

    /// Set the drop hook.
    pub fn with_on_drop<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Table, usize) + Send + Sync + 'static,
    {
        self.on_drop = Some(Arc::new(hook));
        self
    }

    /// Set the drop-target eligibility hook.
    pub fn with_on_allow_drop<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Row, &Row) -> bool + Send + Sync + 'static,
    {
        self.on_allow_drop = Some(Arc::new(hook));
        self
    }

    /// True if hierarchy editing is enabled.
    pub fn hierarchy_enabled(&self) -> bool {
        self.max_indent > 0
    }

    /// Validate the configuration. Called once at attach time; the only
    /// thing that can be malformed up front is the extraction pattern.
    pub fn validate(&self) -> Result<()> {
        Regex::new(&self.serialize_pattern)?;
        Ok(())
    }
}

impl fmt::Debug for DragConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragConfig")
            .field("drag_handle", &self.drag_handle)
            .field("drag_style", &self.drag_style)
            .field("drop_style", &self.drop_style)
            .field("scroll_amount", &self.scroll_amount)
            .field("sensitivity", &self.sensitivity)
            .field("max_indent", &self.max_indent)
            .field("auto_clean", &self.auto_clean)
            .field("serialize_pattern", &self.serialize_pattern)
            .field("serialize_param", &self.serialize_param)
            .field("chain_flat_keys", &self.chain_flat_keys)
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drop", &self.on_drop.is_some())
            .field("on_allow_drop", &self.on_allow_drop.is_some())
            .finish()
    }
}
