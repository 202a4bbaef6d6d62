//! The host-facing drag manager.
//!
//! One manager typically exists per document or window. It owns the
//! registry of attached tables and the single live [`DragSession`], and it
//! exposes the pointer entry points the host routes normalized events
//! into.
//!
//! # Consistency caveat
//!
//! Row order and indent levels mutate live while a drag is in progress, so
//! reading a table (or serializing it) mid-gesture observes an in-progress,
//! not-yet-committed arrangement. That is intentional: the visible reorder
//! IS the feedback. Poll after the drop callback if you need settled state.

use std::collections::HashMap;

use crate::error::{DragError, Result};
use crate::events::{PointerEvent, PressTarget};
use crate::host::{ElementId, TableEnvironment};
use crate::serialize::{self, TableData};
use crate::session::DragSession;
use crate::table::Table;

/// Manager for drag-to-reorder across one or more tables.
#[derive(Debug, Default)]
pub struct TableDragManager {
    tables: HashMap<ElementId, Table>,
    /// Attach order, for deterministic `serialize_all` output.
    order: Vec<ElementId>,
    session: Option<DragSession>,
    last_dragged: Option<ElementId>,
}

impl TableDragManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a table, validating its configuration.
    ///
    /// Re-attaching a table whose element is already registered replaces
    /// the stored wiring instead of duplicating it, so hosts may call this
    /// again after an external refresh.
    pub fn build(&mut self, table: Table) -> Result<ElementId> {
        table.config().validate()?;
        let key = table.element();
        if self.tables.insert(key, table).is_none() {
            self.order.push(key);
        }
        tracing::debug!(
            target: "horizon_tabledrag::manager",
            key = key.as_raw(),
            "table attached"
        );
        Ok(key)
    }

    /// Re-apply draggable wiring for every attached table from its stored
    /// configuration: indent units are mirrored back to the host so its
    /// element tree matches the model after an external refresh.
    pub fn update_tables(&mut self, env: &mut dyn TableEnvironment) {
        for key in &self.order {
            if let Some(table) = self.tables.get(key) {
                for row in table.rows() {
                    env.set_indent_units(row.element, row.indent);
                }
            }
        }
        tracing::debug!(
            target: "horizon_tabledrag::manager",
            tables = self.order.len(),
            "tables rewired"
        );
    }

    /// Look up an attached table.
    pub fn table(&self, key: ElementId) -> Option<&Table> {
        self.tables.get(&key)
    }

    /// Mutable access to an attached table (e.g. to refresh rows).
    pub fn table_mut(&mut self, key: ElementId) -> Option<&mut Table> {
        self.tables.get_mut(&key)
    }

    /// True while a drag session is active on this manager.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Handle a pointer-down on a row of `table`.
    ///
    /// Returns true if a drag session started. Ineligible presses (flagged
    /// rows, missing handle, non-primary button, a session already live)
    /// are silently ignored.
    pub fn pointer_down(
        &mut self,
        env: &mut dyn TableEnvironment,
        table: ElementId,
        press: PressTarget,
        event: &PointerEvent,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(table) = self.tables.get(&table) else {
            return false;
        };
        self.session = DragSession::begin(env, table, press, event);
        self.session.is_some()
    }

    /// Handle a pointer-move. No-op while Idle.
    pub fn pointer_move(&mut self, env: &mut dyn TableEnvironment, event: &PointerEvent) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        match self.tables.get_mut(&session.table()) {
            Some(table) => {
                session.motion(env, table, event);
                self.session = Some(session);
            }
            None => {
                // Table detached mid-gesture; abandon the session. The
                // slot guard releases on drop.
                env.end_pointer_capture(session.table());
            }
        }
    }

    /// Handle a pointer-up, ending any active session.
    ///
    /// Returns true if the gesture changed row order or hierarchy (in
    /// which case the table's `on_drop` hook has been invoked).
    pub fn pointer_up(&mut self, env: &mut dyn TableEnvironment) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        let key = session.table();
        let Some(table) = self.tables.get_mut(&key) else {
            env.end_pointer_capture(key);
            return false;
        };
        self.last_dragged = Some(key);
        session.finish(env, table)
    }

    /// Structured serialization of `table`, defaulting to the most
    /// recently dragged one.
    pub fn table_data(&self, table: Option<ElementId>) -> Result<TableData> {
        serialize::table_data(self.resolve(table)?)
    }

    /// Query-string serialization of the most recently dragged table.
    pub fn serialize(&self) -> Result<String> {
        serialize::serialize_table(self.resolve(None)?)
    }

    /// Query-string serialization of every attached table, in attach
    /// order, joined with `&`.
    pub fn serialize_all(&self) -> Result<String> {
        let mut parts = Vec::with_capacity(self.order.len());
        for key in &self.order {
            if let Some(table) = self.tables.get(key) {
                parts.push(serialize::serialize_table(table)?);
            }
        }
        Ok(parts.join("&"))
    }

    /// JSON serialization of `table`, defaulting to the most recently
    /// dragged one.
    pub fn jsonize(&self, table: Option<ElementId>, pretty: bool) -> Result<String> {
        self.table_data(table)?.to_json(pretty)
    }

    fn resolve(&self, table: Option<ElementId>) -> Result<&Table> {
        let key = match table.or(self.last_dragged) {
            Some(key) => key,
            None => return Err(DragError::NoCurrentTable),
        };
        self.tables.get(&key).ok_or(DragError::UnknownTable)
    }
}
