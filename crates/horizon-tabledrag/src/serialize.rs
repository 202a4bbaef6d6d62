//! Reconstruction of a serializable structure from the row sequence.
//!
//! The table itself is flat; this module derives the nested ownership view
//! from the indent annotations in a single linear pass, grouping row ids
//! into buckets keyed by their nearest ancestor's id. With hierarchy
//! disabled the result is one flat bucket under the table's key.
//!
//! Three renderings are offered: the structured [`TableData`] itself, a
//! URL-query-style string (`key[]=id&...`), and JSON.

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{DragError, Result};
use crate::table::Table;

/// One named group of row ids: the children of a single ancestor, or the
/// root group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// The ancestor's extracted id, or the root key.
    pub key: String,
    /// Extracted ids of the rows in this group, in row order.
    pub ids: Vec<String>,
}

/// The structured serialization of one table: buckets in first-use order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableData {
    /// Buckets in the order their keys first appeared.
    pub buckets: Vec<Bucket>,
}

impl TableData {
    fn bucket_mut(&mut self, key: &str) -> &mut Bucket {
        if let Some(i) = self.buckets.iter().position(|b| b.key == key) {
            return &mut self.buckets[i];
        }
        self.buckets.push(Bucket {
            key: key.to_string(),
            ids: Vec::new(),
        });
        self.buckets.last_mut().expect("bucket was just pushed")
    }

    /// Render as URL-query-style pairs: `key[]=id&key[]=id&...`.
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        for bucket in &self.buckets {
            for id in &bucket.ids {
                pairs.push(format!("{}[]={}", bucket.key, id));
            }
        }
        pairs.join("&")
    }

    /// Render as JSON, formatted or compact.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(rendered)
    }
}

// Serialized as a JSON object mapping bucket key to id list. Emitting the
// entries ourselves keeps them in first-use order without relying on map
// ordering in serde_json.
impl Serialize for TableData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.key, &bucket.ids)?;
        }
        map.end()
    }
}

/// Build the structured serialization of a table.
///
/// Requires the table to carry an id. Rows whose id is missing, or whose
/// extracted id comes out empty, are skipped.
pub fn table_data(table: &Table) -> Result<TableData> {
    let table_id = table.id().ok_or(DragError::MissingTableId)?;
    let config = table.config();
    let root_key = config
        .serialize_param
        .clone()
        .unwrap_or_else(|| table_id.to_string());
    let pattern = Regex::new(&config.serialize_pattern)?;

    let mut data = TableData::default();
    if config.hierarchy_enabled() {
        collect_hierarchy(table, &root_key, &pattern, &mut data);
    } else {
        collect_flat(table, &root_key, &pattern, config.chain_flat_keys, &mut data);
    }
    Ok(data)
}

/// Render one table straight to the query-string form.
pub fn serialize_table(table: &Table) -> Result<String> {
    Ok(table_data(table)?.to_query_string())
}

fn extract_id(pattern: &Regex, raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let extracted = pattern.find(raw)?.as_str();
    if extracted.is_empty() {
        None
    } else {
        Some(extracted.to_string())
    }
}

fn collect_flat(
    table: &Table,
    root_key: &str,
    pattern: &Regex,
    chain_keys: bool,
    data: &mut TableData,
) {
    let mut key = root_key.to_string();
    for row in table.rows() {
        let Some(id) = extract_id(pattern, row.id.as_deref()) else {
            continue;
        };
        data.bucket_mut(&key).ids.push(id.clone());
        if chain_keys {
            // Origin-compatible chaining: the next row lands in a bucket
            // keyed by this one.
            key = id;
        }
    }
}

fn collect_hierarchy(table: &Table, root_key: &str, pattern: &Regex, data: &mut TableData) {
    // Current bucket key plus a stack of (key, depth) pairs recording the
    // bucket that was current before each descent. Ascending pops back to
    // the entry recorded at the new depth; anything deeper is discarded so
    // a stale ancestor can never be reused at the wrong level.
    let mut key = root_key.to_string();
    let mut stack: Vec<(String, usize)> = Vec::new();
    let mut prev: Option<(String, usize)> = None;

    for row in table.rows() {
        let Some(id) = extract_id(pattern, row.id.as_deref()) else {
            continue;
        };
        let depth = row.indent;

        if depth == 0 {
            key = root_key.to_string();
            stack.clear();
        } else if let Some((prev_id, prev_depth)) = &prev {
            if depth > *prev_depth {
                stack.push((key.clone(), *prev_depth));
                key = prev_id.clone();
            } else if depth < *prev_depth {
                let mut restored = None;
                while let Some((stacked_key, stacked_depth)) = stack.pop() {
                    if stacked_depth == depth {
                        restored = Some(stacked_key);
                        break;
                    }
                }
                key = restored.unwrap_or_else(|| root_key.to_string());
            }
        }

        data.bucket_mut(&key).ids.push(id.clone());
        prev = Some((id, depth));
    }
}
