//! Indent-level editing and post-drag repair.
//!
//! Depth rules: the first row of a table is always at depth 0, and a row
//! may sit at most one level below its predecessor. Horizontal drag
//! gestures mutate depth through [`indent`] and [`outdent`]; [`normalize`]
//! repairs whatever a sequence of swaps left inconsistent.

use crate::host::TableEnvironment;
use crate::table::Table;

/// Whether the row at `index` may descend one more level.
///
/// True iff its depth is below the configured maximum AND the immediately
/// preceding row sits at least as deep: a row can only descend one level
/// below a sibling or parent that is already there. The first row can
/// never indent.
pub fn can_indent(table: &Table, index: usize) -> bool {
    let max = table.config().max_indent;
    if max == 0 || index == 0 || index >= table.rows().len() {
        return false;
    }
    let depth = table.rows()[index].indent;
    depth < max && table.rows()[index - 1].indent >= depth
}

/// Increase the row's depth by one nesting unit and mirror it to the host.
///
/// Callers are expected to check [`can_indent`] first; this only applies
/// the mutation.
pub fn indent(table: &mut Table, index: usize, env: &mut dyn TableEnvironment) {
    if index >= table.rows().len() {
        return;
    }
    let row = &mut table.rows_mut()[index];
    row.indent += 1;
    let (element, count) = (row.element, row.indent);
    env.set_indent_units(element, count);
}

/// Decrease the row's depth by one nesting unit; no-op at depth 0.
pub fn outdent(table: &mut Table, index: usize, env: &mut dyn TableEnvironment) {
    if index >= table.rows().len() {
        return;
    }
    let row = &mut table.rows_mut()[index];
    if row.indent == 0 {
        return;
    }
    row.indent -= 1;
    let (element, count) = (row.element, row.indent);
    env.set_indent_units(element, count);
}

/// Repair the depth invariants over the whole table.
///
/// Forces the first row to depth 0, then walks the sequence decrementing
/// any row that sits more than one level below its predecessor until the
/// invariant holds. Changed rows are mirrored to the host.
pub fn normalize(table: &mut Table, env: &mut dyn TableEnvironment) {
    if table.rows().is_empty() {
        return;
    }

    let mut changed: Vec<(usize, usize)> = Vec::new();
    {
        let rows = table.rows_mut();
        if rows[0].indent != 0 {
            rows[0].indent = 0;
            changed.push((0, 0));
        }
        for i in 1..rows.len() {
            let limit = rows[i - 1].indent + 1;
            if rows[i].indent > limit {
                rows[i].indent = limit;
                changed.push((i, limit));
            }
        }
    }

    for (index, count) in changed {
        let element = table.rows()[index].element;
        env.set_indent_units(element, count);
    }
}
