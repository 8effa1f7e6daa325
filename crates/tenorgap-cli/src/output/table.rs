use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::leaf_text;

/// Format output as tables using the tabled crate.
///
/// The result envelope is split into a scalar summary table followed by one
/// table per array field (schedule rows, bucket breakdowns, gap tables), so
/// a `schedule` or `buckets` run reads like the spreadsheet it replaces.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_warnings(map);
                if let Some(Value::String(meth)) = map.get("methodology") {
                    println!("\nMethodology: {}", meth);
                }
            } else {
                print_result(value);
            }
        }
        Value::Array(arr) => print_record_table(None, arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(map) = result else {
        println!("{}", result);
        return;
    };

    // Scalars first
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut has_scalars = false;
    for (key, val) in map {
        if !matches!(val, Value::Array(_) | Value::Object(_)) {
            builder.push_record([key.as_str(), &leaf_text(val)]);
            has_scalars = true;
        }
    }
    if has_scalars {
        println!("{}", Table::from(builder));
    }

    // Then each array field as its own record table, and nested objects
    // (the principal/interest gap tables) recursively
    for (key, val) in map {
        match val {
            Value::Array(arr) if !arr.is_empty() => print_record_table(Some(key), arr),
            Value::Object(_) => {
                println!("\n[{}]", key);
                print_result(val);
            }
            _ => {}
        }
    }
}

fn print_record_table(title: Option<&str>, arr: &[Value]) {
    if let Some(title) = title {
        println!("\n[{}]", title);
    }
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);
        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(leaf_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", leaf_text(item));
        }
    }
}

fn print_warnings(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }
}
