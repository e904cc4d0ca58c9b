//! Small shared helpers for row values and text.

use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Look up a dot-path inside a row object, `get(row, "a.b.c")` style.
///
/// Returns `None` when any segment is missing or the intermediate value
/// is not an object (arrays are indexed by numeric segments).
pub fn lookup_path<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = row;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Render a scalar value the way a cell displays it.
///
/// Strings render bare (no quotes), null renders empty, everything else
/// uses its JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Canonical string form of a scalar, used for option value → label maps.
pub fn value_key(value: &Value) -> String {
    display_value(value)
}

/// Truncate a string to a display width, appending `…` when cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if text.width() <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
