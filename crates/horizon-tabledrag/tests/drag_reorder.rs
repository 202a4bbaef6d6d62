//! End-to-end gesture flows over a mock host environment.
//!
//! The mock lays rows out vertically at a fixed row height and reflows
//! whenever the core mirrors a structural move, the way a real host's
//! element tree would. Each test drives the manager through the same
//! pointer_down/move/up entry points a host uses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_tabledrag::{
    DragConfig, ElementId, Point, PointerEvent, PressTarget, Row, RowStyle, Size, Table,
    TableDragManager, TableEnvironment,
};

/// Gestures claim the process-wide session slot; run them one at a time.
static GESTURE_LOCK: Mutex<()> = Mutex::new(());

const ROW_HEIGHT: f32 = 20.0;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// A host with vertically stacked rows and a scrollable viewport.
struct MockEnv {
    /// Visual row order, reflowed on every mirrored move.
    rows: Vec<ElementId>,
    viewport: Size,
    scroll: Point,
    /// Log of scroll_by deltas.
    scrolled: Vec<Point>,
    /// Log of pointer capture transitions.
    captures: Vec<&'static str>,
    /// Log of (element, class, applied?) style transitions.
    styles: Vec<(ElementId, String, bool)>,
    /// Latest mirrored indent units per row.
    indents: HashMap<ElementId, usize>,
}

impl MockEnv {
    fn new(rows: &[ElementId]) -> Self {
        Self {
            rows: rows.to_vec(),
            viewport: Size::new(200.0, 500.0),
            scroll: Point::ZERO,
            scrolled: Vec::new(),
            captures: Vec::new(),
            styles: Vec::new(),
            indents: HashMap::new(),
        }
    }

    fn visual_index(&self, element: ElementId) -> usize {
        self.rows
            .iter()
            .position(|e| *e == element)
            .expect("row not in mock layout")
    }
}

impl TableEnvironment for MockEnv {
    fn offset_parent(&self, _element: ElementId) -> Option<ElementId> {
        None
    }

    fn offset_in_parent(&self, element: ElementId) -> Point {
        Point::new(0.0, self.visual_index(element) as f32 * ROW_HEIGHT)
    }

    fn size_of(&self, _element: ElementId) -> Size {
        Size::new(200.0, ROW_HEIGHT)
    }

    fn first_child(&self, _element: ElementId) -> Option<ElementId> {
        None
    }

    fn begin_pointer_capture(&mut self, _table: ElementId) {
        self.captures.push("begin");
    }

    fn end_pointer_capture(&mut self, _table: ElementId) {
        self.captures.push("end");
    }

    fn apply_row_style(&mut self, row: ElementId, style: &RowStyle) {
        if let Some(class) = &style.class {
            self.styles.push((row, class.clone(), true));
        }
    }

    fn clear_row_style(&mut self, row: ElementId, style: &RowStyle) {
        if let Some(class) = &style.class {
            self.styles.push((row, class.clone(), false));
        }
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn scroll_by(&mut self, delta: Point) {
        self.scroll += delta;
        self.scrolled.push(delta);
    }

    fn move_row_before(&mut self, row: ElementId, target: ElementId) {
        let from = self.visual_index(row);
        self.rows.remove(from);
        let to = self.visual_index(target);
        self.rows.insert(to, row);
    }

    fn move_row_after(&mut self, row: ElementId, target: ElementId) {
        let from = self.visual_index(row);
        self.rows.remove(from);
        let to = self.visual_index(target);
        self.rows.insert(to + 1, row);
    }

    fn set_indent_units(&mut self, row: ElementId, count: usize) {
        self.indents.insert(row, count);
    }
}

fn el(raw: u64) -> ElementId {
    ElementId::from_raw(raw)
}

const TABLE_EL: ElementId = ElementId::from_raw(1);

fn build_fixture(
    config: DragConfig,
    rows: Vec<Row>,
) -> (TableDragManager, MockEnv, ElementId) {
    init_tracing();
    let elements: Vec<ElementId> = rows.iter().map(|r| r.element).collect();
    let env = MockEnv::new(&elements);
    let mut manager = TableDragManager::new();
    let key = manager
        .build(
            Table::new(TABLE_EL)
                .with_id("t")
                .with_config(config)
                .with_rows(rows),
        )
        .expect("fixture config is valid");
    (manager, env, key)
}

fn three_rows() -> Vec<Row> {
    vec![
        Row::new(el(2)).with_id("a"),
        Row::new(el(3)).with_id("b"),
        Row::new(el(4)).with_id("c"),
    ]
}

fn order(manager: &TableDragManager, key: ElementId) -> Vec<String> {
    manager
        .table(key)
        .unwrap()
        .rows()
        .iter()
        .map(|r| r.id.clone().unwrap())
        .collect()
}

fn depths(manager: &TableDragManager, key: ElementId) -> Vec<usize> {
    manager
        .table(key)
        .unwrap()
        .rows()
        .iter()
        .map(|r| r.indent)
        .collect()
}

#[test]
fn drag_down_swaps_rows_live_and_fires_on_drop_once() {
    let _lock = GESTURE_LOCK.lock();
    let drops = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&drops);
    let config = DragConfig::new().with_on_drop(move |_table, _row| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let (mut manager, mut env, key) = build_fixture(config, three_rows());

    assert!(manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 10.0)));
    assert!(manager.is_dragging());

    // The swap happens during the move, before the drop.
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 31.0));
    assert_eq!(order(&manager, key), ["b", "a", "c"]);
    assert_eq!(env.rows, vec![el(3), el(2), el(4)]);

    assert!(manager.pointer_up(&mut env));
    assert!(!manager.is_dragging());
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    // The most recently dragged table is the default serialization target.
    assert_eq!(manager.serialize().unwrap(), "t[]=b&t[]=a&t[]=c");
}

#[test]
fn drop_back_at_origin_does_not_fire_on_drop() {
    let _lock = GESTURE_LOCK.lock();
    let drops = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&drops);
    let config = DragConfig::new().with_on_drop(move |_table, _row| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let (mut manager, mut env, key) = build_fixture(config, three_rows());

    manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 10.0));
    // Down past "b", then back up to the top: the order round-trips.
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 31.0));
    assert_eq!(order(&manager, key), ["b", "a", "c"]);
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 9.0));
    assert_eq!(order(&manager, key), ["a", "b", "c"]);

    assert!(!manager.pointer_up(&mut env));
    assert_eq!(drops.load(Ordering::SeqCst), 0);
}

#[test]
fn no_drop_rows_are_never_targets() {
    let _lock = GESTURE_LOCK.lock();
    let rows = vec![
        Row::new(el(2)).with_id("a"),
        Row::new(el(3)).with_id("b").with_no_drop(),
        Row::new(el(4)).with_id("c"),
    ];
    let (mut manager, mut env, key) = build_fixture(DragConfig::new(), rows);

    manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 10.0));

    // Directly over "b": no eligible target, nothing moves.
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 31.0));
    assert_eq!(order(&manager, key), ["a", "b", "c"]);

    // Over "c": the swap lands after it, skipping "b" entirely.
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 45.0));
    assert_eq!(order(&manager, key), ["b", "c", "a"]);

    manager.pointer_up(&mut env);
}

#[test]
fn allow_drop_hook_excludes_candidates() {
    let _lock = GESTURE_LOCK.lock();
    let config = DragConfig::new()
        .with_on_allow_drop(|_dragged, candidate| candidate.id.as_deref() != Some("b"));
    let (mut manager, mut env, key) = build_fixture(config, three_rows());

    manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 10.0));
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 31.0));
    // "b" was denied by the hook, so the pointer over its band does nothing.
    assert_eq!(order(&manager, key), ["a", "b", "c"]);
    manager.pointer_up(&mut env);
}

#[test]
fn sideways_gesture_indents_and_outdents_over_own_row() {
    let _lock = GESTURE_LOCK.lock();
    let rows = vec![Row::new(el(2)).with_id("a"), Row::new(el(3)).with_id("b")];
    let (mut manager, mut env, key) = build_fixture(DragConfig::new().with_max_indent(2), rows);

    manager.pointer_down(&mut env, key, PressTarget::row(1), &PointerEvent::mouse(5.0, 30.0));

    // Right over its own band: indent one level.
    manager.pointer_move(&mut env, &PointerEvent::mouse(25.0, 30.0));
    assert_eq!(depths(&manager, key), [0, 1]);
    assert_eq!(env.indents.get(&el(3)), Some(&1));

    // Further right: the predecessor is shallower, so no second level.
    manager.pointer_move(&mut env, &PointerEvent::mouse(45.0, 30.0));
    assert_eq!(depths(&manager, key), [0, 1]);

    // Back left: outdent to the root level.
    manager.pointer_move(&mut env, &PointerEvent::mouse(15.0, 30.0));
    assert_eq!(depths(&manager, key), [0, 0]);
    assert_eq!(env.indents.get(&el(3)), Some(&0));

    // Depth round-tripped, so the gesture changed nothing overall.
    assert!(!manager.pointer_up(&mut env));
}

#[test]
fn indent_change_fires_on_drop_and_serializes_nested() {
    let _lock = GESTURE_LOCK.lock();
    let drops = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&drops);
    let rows = vec![Row::new(el(2)).with_id("a"), Row::new(el(3)).with_id("b")];
    let config = DragConfig::new()
        .with_max_indent(2)
        .with_on_drop(move |_table, _row| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    let (mut manager, mut env, key) = build_fixture(config, rows);

    manager.pointer_down(&mut env, key, PressTarget::row(1), &PointerEvent::mouse(5.0, 30.0));
    manager.pointer_move(&mut env, &PointerEvent::mouse(25.0, 30.0));
    assert!(manager.pointer_up(&mut env));
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    // "b" now nests under "a".
    assert_eq!(manager.serialize().unwrap(), "t[]=a&a[]=b");
}

#[test]
fn drop_repairs_hierarchy_violations() {
    let _lock = GESTURE_LOCK.lock();
    let rows = vec![
        Row::new(el(2)).with_id("a").with_indent(0),
        Row::new(el(3)).with_id("b").with_indent(1),
        Row::new(el(4)).with_id("c").with_indent(2),
    ];
    let (mut manager, mut env, key) = build_fixture(DragConfig::new().with_max_indent(3), rows);

    // Drag the deepest row to the top.
    manager.pointer_down(&mut env, key, PressTarget::row(2), &PointerEvent::mouse(5.0, 50.0));
    manager.pointer_move(&mut env, &PointerEvent::mouse(5.0, 15.0));
    assert_eq!(order(&manager, key), ["c", "a", "b"]);

    manager.pointer_up(&mut env);

    // The first row was forced to the root and the invariant holds.
    let d = depths(&manager, key);
    assert_eq!(d[0], 0);
    for i in 1..d.len() {
        assert!(d[i] <= d[i - 1] + 1);
    }
    assert_eq!(d, vec![0, 0, 1]);
    assert_eq!(env.indents.get(&el(4)), Some(&0));
}

#[test]
fn drag_visuals_are_applied_and_cleared() {
    let _lock = GESTURE_LOCK.lock();
    let config = DragConfig::new().with_drop_style(RowStyle::class("tabledrag-dropped"));
    let (mut manager, mut env, key) = build_fixture(config, three_rows());

    manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 10.0));
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 31.0));
    manager.pointer_up(&mut env);

    assert_eq!(
        env.styles,
        vec![
            (el(2), "tabledrag-dragging".to_string(), true),
            (el(2), "tabledrag-dragging".to_string(), false),
            (el(2), "tabledrag-dropped".to_string(), true),
        ]
    );
    assert_eq!(env.captures, vec!["begin", "end"]);
}

#[test]
fn pointer_near_viewport_edges_requests_scrolling() {
    let _lock = GESTURE_LOCK.lock();
    let (mut manager, mut env, key) = build_fixture(DragConfig::new(), three_rows());

    manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 10.0));

    // Near the top edge: scroll up by the configured increment.
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 2.0));
    assert_eq!(env.scrolled, vec![Point::new(0.0, -5.0)]);

    // Near the bottom edge: scroll down.
    env.scroll = Point::ZERO;
    manager.pointer_move(&mut env, &PointerEvent::mouse(10.0, 498.0));
    assert_eq!(env.scrolled.last(), Some(&Point::new(0.0, 5.0)));

    manager.pointer_up(&mut env);
}

#[test]
fn only_one_session_process_wide() {
    let _lock = GESTURE_LOCK.lock();
    let (mut manager, mut env, key) = build_fixture(DragConfig::new(), three_rows());

    assert!(manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::mouse(10.0, 10.0)));
    // A second press on the same manager is ignored while Active.
    assert!(!manager.pointer_down(&mut env, key, PressTarget::row(1), &PointerEvent::mouse(10.0, 30.0)));

    // Even a separate manager cannot start a session: the slot is global.
    let rows = vec![Row::new(el(20)).with_id("x")];
    let mut other_env = MockEnv::new(&[el(20)]);
    let mut other = TableDragManager::new();
    let other_key = other
        .build(Table::new(el(10)).with_id("u").with_rows(rows))
        .unwrap();
    assert!(!other.pointer_down(
        &mut other_env,
        other_key,
        PressTarget::row(0),
        &PointerEvent::mouse(5.0, 5.0)
    ));

    // Ending the first gesture frees the slot for the next one.
    manager.pointer_up(&mut env);
    assert!(other.pointer_down(
        &mut other_env,
        other_key,
        PressTarget::row(0),
        &PointerEvent::mouse(5.0, 5.0)
    ));
    other.pointer_up(&mut other_env);
}

#[test]
fn touch_events_drive_the_same_machine() {
    let _lock = GESTURE_LOCK.lock();
    let (mut manager, mut env, key) = build_fixture(DragConfig::new(), three_rows());

    assert!(manager.pointer_down(&mut env, key, PressTarget::row(0), &PointerEvent::touch(10.0, 10.0)));
    manager.pointer_move(&mut env, &PointerEvent::touch(10.0, 31.0));
    assert_eq!(order(&manager, key), ["b", "a", "c"]);
    assert!(manager.pointer_up(&mut env));
}

#[test]
fn update_tables_resyncs_indent_units() {
    let _lock = GESTURE_LOCK.lock();
    let rows = vec![
        Row::new(el(2)).with_id("a").with_indent(0),
        Row::new(el(3)).with_id("b").with_indent(1),
    ];
    let (mut manager, mut env, _key) =
        build_fixture(DragConfig::new().with_max_indent(2), rows);

    // Simulate an external refresh that lost the host-side indents.
    env.indents.clear();
    manager.update_tables(&mut env);
    assert_eq!(env.indents.get(&el(2)), Some(&0));
    assert_eq!(env.indents.get(&el(3)), Some(&1));
}
