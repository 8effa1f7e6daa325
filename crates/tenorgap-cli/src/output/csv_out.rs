use serde_json::Value;
use std::io;

use super::leaf_text;

/// Keys that hold the primary record array of each result type.
const RECORD_KEYS: [&str; 2] = ["schedule", "buckets"];

/// Write output as CSV to stdout.
///
/// Schedule and bucket results emit their record array directly; anything
/// else falls back to a two-column field/value layout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            if let Some(arr) = primary_records(result) {
                write_records(&mut wtr, arr);
            } else if let Value::Object(fields) = result {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in fields {
                    let _ = wtr.write_record([key.as_str(), &leaf_text(val)]);
                }
            }
        }
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&leaf_text(value)]);
        }
    }

    let _ = wtr.flush();
}

fn primary_records(result: &Value) -> Option<&Vec<Value>> {
    let map = result.as_object()?;
    RECORD_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(leaf_text).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&leaf_text(item)]);
        }
    }
}
