//! Drag-to-reorder and hierarchy editing for tabular data.
//!
//! This crate implements the interaction core of a draggable table: a user
//! grabs a row, drags it vertically to reorder, optionally drags it
//! sideways to nest it under the row above, and drops it. The resulting
//! order and hierarchy can then be serialized for transport.
//!
//! The crate is host-agnostic. It never touches a UI tree; instead the
//! host implements [`TableEnvironment`] (element geometry, pointer
//! capture, visual state, scrolling, structural mirroring) and routes its
//! normalized pointer events into a [`TableDragManager`].
//!
//! # Architecture
//!
//! - [`geometry`]: pure position probing for elements and pointer events
//! - [`direction`]: sensitivity-debounced per-axis direction detection
//! - [`hierarchy`]: indent editing rules and the post-drop repair pass
//! - [`session`]: the per-gesture state machine (Idle -> Active -> Idle)
//! - [`serialize`]: bucket reconstruction, query-string and JSON forms
//! - [`manager`]: the host-facing registry and pointer entry points
//!
//! The table model is deliberately flat: rows are an ordered sequence with
//! a per-row indent level, and any nested view is derived by a linear pass
//! when needed. There is no parent-pointer graph to keep consistent while
//! rows move around mid-gesture.
//!
//! # Example
//!
//! ```ignore
//! use horizon_tabledrag::{
//!     DragConfig, ElementId, PointerEvent, PressTarget, Row, Table, TableDragManager,
//! };
//!
//! let mut manager = TableDragManager::new();
//! let key = manager.build(
//!     Table::new(ElementId::from_raw(1))
//!         .with_id("tasks")
//!         .with_config(DragConfig::new().with_max_indent(3))
//!         .with_rows(vec![
//!             Row::new(ElementId::from_raw(2)).with_id("task-1"),
//!             Row::new(ElementId::from_raw(3)).with_id("task-2"),
//!         ]),
//! )?;
//!
//! // In the host's event handlers (env implements TableEnvironment):
//! manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 12.0));
//! manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 40.0));
//! manager.pointer_up(&mut env);
//!
//! println!("{}", manager.serialize()?);
//! ```

pub mod config;
pub mod direction;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hierarchy;
pub mod host;
pub mod manager;
pub mod serialize;
pub mod session;
pub mod table;
pub mod types;

pub use config::{
    AllowDropHook, DragConfig, DragStartHook, DropHook, DEFAULT_DRAG_CLASS,
    DEFAULT_SCROLL_AMOUNT, DEFAULT_SENSITIVITY, DEFAULT_SERIALIZE_PATTERN,
};
pub use direction::{DirectionFilter, MoveDirection};
pub use error::{DragError, ErrorPayload, Result};
pub use events::{MouseButton, PointerEvent, PressTarget};
pub use host::{ElementId, RowStyle, TableEnvironment};
pub use manager::TableDragManager;
pub use serialize::{Bucket, TableData};
pub use session::DragSession;
pub use table::{Row, Table};
pub use types::{Point, Size};
