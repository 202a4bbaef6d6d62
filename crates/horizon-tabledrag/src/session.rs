//! The drag session state machine.
//!
//! A session exists only between pointer-down and pointer-up: Idle, then
//! Active, then Idle again, with all gesture state held by the session
//! value itself. The manager owns at most one session; a process-wide slot
//! backs that up so a second manager (or a re-entrant down event) can never
//! start a concurrent gesture.
//!
//! Everything here is synchronous and completes within the originating
//! event. Row swaps and indent changes are applied to the table (and
//! mirrored to the host) the moment they are detected, so the user sees
//! the reorder live rather than at drop time.

use parking_lot::Mutex;

use crate::direction::DirectionFilter;
use crate::events::{PointerEvent, PressTarget};
use crate::geometry;
use crate::hierarchy;
use crate::host::{ElementId, TableEnvironment};
use crate::table::Table;
use crate::types::Point;

/// Process-wide marker: is any drag session live right now?
static SESSION_SLOT: Mutex<bool> = Mutex::new(false);

/// RAII claim on the process-wide session slot.
///
/// Dropping the guard frees the slot, so every exit path from the Active
/// state releases it without bookkeeping.
#[derive(Debug)]
pub(crate) struct SlotGuard(());

impl SlotGuard {
    fn acquire() -> Option<Self> {
        let mut active = SESSION_SLOT.lock();
        if *active {
            return None;
        }
        *active = true;
        Some(Self(()))
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        *SESSION_SLOT.lock() = false;
    }
}

/// Result of the drop-target scan for one move event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropScan {
    /// No row's band contains the pointer.
    None,
    /// The pointer is still over the dragged row itself.
    Dragged,
    /// An eligible drop target at this row index.
    Target(usize),
}

/// One live drag gesture.
///
/// Holds the dragged row, the pointer-to-row offset captured at grab time,
/// the direction filter with the last processed coordinates, and the order
/// fingerprint taken at start.
#[derive(Debug)]
pub struct DragSession {
    table: ElementId,
    row: ElementId,
    grab_offset: Point,
    filter: DirectionFilter,
    start_fingerprint: u64,
    style_applied: bool,
    _slot: SlotGuard,
}

impl DragSession {
    /// Try to start a session for a press on `table`.
    ///
    /// Returns `None` when the press is not eligible: wrong button, row
    /// flagged `no_drag`, press outside a configured drag handle, or
    /// another session already live anywhere in the process.
    pub(crate) fn begin(
        env: &mut dyn TableEnvironment,
        table: &Table,
        press: PressTarget,
        event: &PointerEvent,
    ) -> Option<Self> {
        if !event.starts_gesture() {
            return None;
        }
        let row = table.rows().get(press.row)?;
        if row.no_drag {
            return None;
        }
        let config = table.config();
        if config.drag_handle.is_some() && !press.within_handle {
            return None;
        }
        let slot = SlotGuard::acquire()?;

        let grab_offset = geometry::offset_within(env, row.element, event);
        let coords = geometry::pointer_coords(event);
        let session = Self {
            table: table.element(),
            row: row.element,
            grab_offset,
            filter: DirectionFilter::new(coords.x - grab_offset.x, coords.y - grab_offset.y),
            start_fingerprint: table.fingerprint(),
            style_applied: false,
            _slot: slot,
        };

        env.begin_pointer_capture(table.element());
        if let Some(hook) = &config.on_drag_start {
            hook(table, press.row);
        }
        tracing::debug!(
            target: "horizon_tabledrag::session",
            row = press.row,
            "drag session started"
        );
        Some(session)
    }

    /// The table this session is dragging within.
    pub fn table(&self) -> ElementId {
        self.table
    }

    /// The dragged row's element handle.
    pub fn dragged_row(&self) -> ElementId {
        self.row
    }

    /// Process a pointer move while Active.
    pub(crate) fn motion(
        &mut self,
        env: &mut dyn TableEnvironment,
        table: &mut Table,
        event: &PointerEvent,
    ) {
        let pointer = geometry::pointer_coords(event);
        let virtual_pos = pointer - self.grab_offset;

        self.auto_scroll(env, pointer, table.config().scroll_amount);

        if !self.style_applied {
            env.apply_row_style(self.row, &table.config().drag_style);
            self.style_applied = true;
        }

        let direction =
            self.filter
                .detect(virtual_pos.x, virtual_pos.y, table.config().sensitivity);
        if direction.is_none() {
            return;
        }

        let Some(from) = table.row_index_of(self.row) else {
            return;
        };

        match self.find_drop_target(env, table, from, virtual_pos.y) {
            DropScan::Dragged => {
                // Sideways motion over the row itself edits its depth.
                // Sign contract: right is -1 (indent), left is 1 (outdent).
                if table.config().hierarchy_enabled() && direction.horizontal != 0 {
                    if direction.horizontal > 0 {
                        hierarchy::outdent(table, from, env);
                    } else if hierarchy::can_indent(table, from) {
                        hierarchy::indent(table, from, env);
                    }
                }
            }
            DropScan::Target(target) => {
                // Sign contract: up is 1 (insert before), down is -1
                // (insert after). The reorder is live, not deferred.
                if direction.vertical != 0 {
                    let target_el = table.rows()[target].element;
                    if direction.vertical > 0 {
                        table.move_row_before(from, target);
                        env.move_row_before(self.row, target_el);
                    } else {
                        table.move_row_after(from, target);
                        env.move_row_after(self.row, target_el);
                    }
                    tracing::trace!(
                        target: "horizon_tabledrag::session",
                        from,
                        target,
                        vertical = direction.vertical,
                        "row repositioned"
                    );
                }
            }
            DropScan::None => {}
        }
    }

    /// End the session: release capture, repair hierarchy, swap visuals,
    /// and report whether the gesture changed anything.
    pub(crate) fn finish(self, env: &mut dyn TableEnvironment, table: &mut Table) -> bool {
        env.end_pointer_capture(self.table);

        let config = table.config().clone();
        if config.hierarchy_enabled() && config.auto_clean {
            hierarchy::normalize(table, env);
        }

        if self.style_applied {
            env.clear_row_style(self.row, &config.drag_style);
        }
        if !config.drop_style.is_empty() {
            env.apply_row_style(self.row, &config.drop_style);
        }

        let changed = table.fingerprint() != self.start_fingerprint;
        if changed {
            if let Some(hook) = &config.on_drop {
                if let Some(index) = table.row_index_of(self.row) {
                    hook(table, index);
                }
            }
        }
        tracing::debug!(
            target: "horizon_tabledrag::session",
            changed,
            "drag session ended"
        );
        changed
        // The slot guard drops here, freeing the process-wide session slot.
    }

    /// Locate the drop target for the virtual y position: the first row
    /// whose vertical midpoint band contains it.
    ///
    /// The dragged row matching is reported separately (it routes to the
    /// hierarchy branch); `no_drop` rows and rows denied by the
    /// `on_allow_drop` hook are skipped as if not there.
    fn find_drop_target(
        &self,
        env: &dyn TableEnvironment,
        table: &Table,
        from: usize,
        y: f32,
    ) -> DropScan {
        let config = table.config();
        for (i, row) in table.rows().iter().enumerate() {
            let mut height = env.size_of(row.element).height;
            if height == 0.0 {
                if let Some(child) = env.first_child(row.element) {
                    height = env.size_of(child).height;
                }
            }
            let half = height / 2.0;
            let row_y = geometry::position(env, row.element).y;
            if y <= row_y - half || y >= row_y + half {
                continue;
            }

            if i == from {
                return DropScan::Dragged;
            }
            if row.no_drop {
                continue;
            }
            if let Some(allow) = &config.on_allow_drop {
                if !allow(&table.rows()[from], row) {
                    continue;
                }
            }
            return DropScan::Target(i);
        }
        DropScan::None
    }

    /// Nudge the viewport when the pointer is within the scroll increment
    /// of its top or bottom edge. The scroll itself is the host's concern.
    fn auto_scroll(&self, env: &mut dyn TableEnvironment, pointer: Point, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        let view = env.viewport_size();
        if view.is_empty() {
            return;
        }
        let y_in_view = pointer.y - env.scroll_offset().y;
        if y_in_view < amount {
            env.scroll_by(Point::new(0.0, -amount));
        } else if view.height - y_in_view < amount {
            env.scroll_by(Point::new(0.0, amount));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DragConfig;
    use crate::events::MouseButton;
    use crate::table::Row;
    use crate::types::Size;

    /// Tests that claim the process-wide session slot must not overlap.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    struct NullEnv;

    impl TableEnvironment for NullEnv {
        fn offset_parent(&self, _element: ElementId) -> Option<ElementId> {
            None
        }
        fn offset_in_parent(&self, _element: ElementId) -> Point {
            Point::ZERO
        }
        fn size_of(&self, _element: ElementId) -> Size {
            Size::new(100.0, 20.0)
        }
        fn first_child(&self, _element: ElementId) -> Option<ElementId> {
            None
        }
    }

    fn two_row_table(config: DragConfig) -> Table {
        Table::new(ElementId::from_raw(100))
            .with_id("t")
            .with_config(config)
            .with_rows(vec![
                Row::new(ElementId::from_raw(1)).with_id("a"),
                Row::new(ElementId::from_raw(2)).with_id("b"),
            ])
    }

    #[test]
    fn test_slot_guard_is_exclusive() {
        let _lock = TEST_LOCK.lock();
        let first = SlotGuard::acquire().unwrap();
        assert!(SlotGuard::acquire().is_none());
        drop(first);
        // Released on drop, so the slot is free again.
        let second = SlotGuard::acquire().unwrap();
        drop(second);
    }

    #[test]
    fn test_begin_rejects_no_drag_rows() {
        let mut env = NullEnv;
        let table = Table::new(ElementId::from_raw(100))
            .with_id("t")
            .with_rows(vec![Row::new(ElementId::from_raw(1)).with_no_drag()]);
        let session = DragSession::begin(
            &mut env,
            &table,
            PressTarget::row(0),
            &PointerEvent::mouse(5.0, 5.0),
        );
        assert!(session.is_none());
    }

    #[test]
    fn test_begin_requires_handle_when_configured() {
        let _lock = TEST_LOCK.lock();
        let mut env = NullEnv;
        let table = two_row_table(DragConfig::new().with_drag_handle(".handle"));

        let outside = DragSession::begin(
            &mut env,
            &table,
            PressTarget::row(0),
            &PointerEvent::mouse(5.0, 5.0),
        );
        assert!(outside.is_none());

        let inside = DragSession::begin(
            &mut env,
            &table,
            PressTarget::handle(0),
            &PointerEvent::mouse(5.0, 5.0),
        );
        assert!(inside.is_some());
    }

    #[test]
    fn test_begin_rejects_secondary_button() {
        let mut env = NullEnv;
        let table = two_row_table(DragConfig::new());
        let session = DragSession::begin(
            &mut env,
            &table,
            PressTarget::row(0),
            &PointerEvent::Mouse {
                page_pos: Point::new(5.0, 5.0),
                button: MouseButton::Right,
            },
        );
        assert!(session.is_none());
    }

    #[test]
    fn test_begin_rejects_out_of_range_row() {
        let mut env = NullEnv;
        let table = two_row_table(DragConfig::new());
        let session = DragSession::begin(
            &mut env,
            &table,
            PressTarget::row(9),
            &PointerEvent::mouse(5.0, 5.0),
        );
        assert!(session.is_none());
    }
}
