//! Position probing for elements and pointer events.
//!
//! These are pure functions over the environment's geometry capability: no
//! state, no side effects. They exist so the session logic can reason in a
//! single absolute coordinate space regardless of how the host nests its
//! elements.

use crate::events::PointerEvent;
use crate::host::{ElementId, TableEnvironment};
use crate::types::Point;

/// Absolute position of an element, summing offset contributions up the
/// containment chain.
///
/// A zero-height element is measured through its first child instead; rows
/// collapse to zero height in some hosts when their own box carries no
/// content.
pub fn position(env: &dyn TableEnvironment, element: ElementId) -> Point {
    let mut target = element;
    if env.size_of(target).height == 0.0 {
        if let Some(child) = env.first_child(target) {
            target = child;
        }
    }

    let mut pos = Point::ZERO;
    let mut current = Some(target);
    while let Some(el) = current {
        pos += env.offset_in_parent(el);
        current = env.offset_parent(el);
    }
    pos
}

/// Absolute page coordinates of a pointer event.
///
/// Touch events resolve to their first touch point; an empty touch list
/// yields the origin rather than failing.
pub fn pointer_coords(event: &PointerEvent) -> Point {
    match event {
        PointerEvent::Mouse { page_pos, .. } => *page_pos,
        PointerEvent::Touch { points } => points.first().copied().unwrap_or(Point::ZERO),
    }
}

/// Pointer position relative to an element's absolute position.
///
/// Satisfies `offset_within(env, e, ev) + position(env, e) == pointer_coords(ev)`.
pub fn offset_within(
    env: &dyn TableEnvironment,
    element: ElementId,
    event: &PointerEvent,
) -> Point {
    pointer_coords(event) - position(env, element)
}
