use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format. Object `data` is merged
/// into the JSON envelope; anything else lands under `data`.
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            match (response.as_object_mut(), data) {
                (Some(envelope), Some(Value::Object(extra))) => envelope.extend(extra),
                (Some(envelope), Some(other)) => {
                    envelope.insert("data".to_string(), other);
                }
                _ => {}
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": message
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a list of rows; text mode prints one compact JSON object per line
pub fn output_rows(output_format: &OutputFormat, collection_name: &str, rows: &[Value]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: rows,
                    "total": rows.len(),
                }))?
            );
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No {} found", collection_name);
            }
            for row in rows {
                println!("{}", serde_json::to_string(row)?);
            }
        }
    }
    Ok(())
}

/// Output a single object; text mode prints `key: value` lines
pub fn output_item(output_format: &OutputFormat, item: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Text => match item.as_object() {
            Some(fields) => {
                for (key, value) in fields {
                    match value {
                        Value::String(s) => println!("{}: {}", key, s),
                        other => println!("{}: {}", key, other),
                    }
                }
            }
            None => println!("{}", item),
        },
    }
    Ok(())
}
