// Row objects: processed rows keyed by their header row

use serde_json::{Map, Value};

use datashelf_engine::Row;

/// One data row keyed by header name, in header order.
pub type RowObject = Map<String, Value>;

/// Treat the first row as the header and key every later row by it.
///
/// Cells missing at the end of a row become `""`. When two header cells have
/// the same text, the later column's value replaces the earlier one (the key
/// keeps its first position). Fewer than two rows yields no objects.
pub fn to_row_objects(rows: &[Row]) -> Vec<RowObject> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    data.iter()
        .map(|row| {
            let mut obj = Map::with_capacity(header.len());
            for (i, name) in header.iter().enumerate() {
                let value = row.get(i).cloned().unwrap_or_default();
                obj.insert(name.clone(), Value::String(value));
            }
            obj
        })
        .collect()
}

/// Row objects as a pretty-printed JSON array.
pub fn to_json(rows: &[Row]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_row_objects(rows))
}
