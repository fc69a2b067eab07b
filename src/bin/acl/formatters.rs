use kafka_acl::config::OutputFormat;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Format rows as JSON, CSV or a table. `columns` fixes the column order for
/// CSV and table output.
pub fn format_output<T>(
    rows: &[T],
    columns: &[&str],
    format: OutputFormat,
    no_color: bool,
) -> Result<String, Box<dyn std::error::Error>>
where
    T: Serialize,
{
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => format_csv(&to_objects(rows)?, columns),
        OutputFormat::Table => format_table(&to_objects(rows)?, columns, no_color),
    }
}

fn to_objects<T: Serialize>(rows: &[T]) -> Result<Vec<serde_json::Map<String, Value>>, Box<dyn std::error::Error>> {
    let mut objects = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::to_value(row)? {
            Value::Object(obj) => objects.push(obj),
            other => return Err(format!("expected an object row, got {}", other).into()),
        }
    }
    Ok(objects)
}

fn cell(obj: &serde_json::Map<String, Value>, column: &str) -> String {
    match obj.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn format_csv(rows: &[serde_json::Map<String, Value>], columns: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let mut csv_lines = vec![columns.join(",")];

    for obj in rows {
        let values: Vec<String> = columns
            .iter()
            .map(|column| csv_escape_value(&cell(obj, column)))
            .collect();
        csv_lines.push(values.join(","));
    }

    Ok(csv_lines.join("\n"))
}

pub fn csv_escape_value(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn format_table(
    rows: &[serde_json::Map<String, Value>],
    columns: &[&str],
    no_color: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    if rows.is_empty() {
        return Ok("No ACLs".to_string());
    }

    // Calculate column widths
    let mut col_widths: HashMap<&str, usize> = columns.iter().map(|c| (*c, c.len())).collect();
    for obj in rows {
        for column in columns {
            if let Some(width) = col_widths.get_mut(column) {
                *width = (*width).max(cell(obj, column).len());
            }
        }
    }

    let mut result = Vec::new();

    let header_row = columns
        .iter()
        .map(|c| format!("{:<width$}", c.to_uppercase(), width = col_widths[c]))
        .collect::<Vec<_>>()
        .join(" | ");
    result.push(if no_color { header_row } else { format!("\x1b[1m{}\x1b[0m", header_row) });

    let separator = columns
        .iter()
        .map(|c| "=".repeat(col_widths[c]))
        .collect::<Vec<_>>()
        .join("=+=");
    result.push(separator);

    for obj in rows {
        let row = columns
            .iter()
            .map(|c| format!("{:<width$}", cell(obj, c), width = col_widths[c]))
            .collect::<Vec<_>>()
            .join(" | ");
        result.push(row);
    }

    Ok(result.join("\n"))
}

/// Print formatted output to stdout
pub fn print_output<T>(
    rows: &[T],
    columns: &[&str],
    format: OutputFormat,
    no_color: bool,
) -> Result<(), Box<dyn std::error::Error>>
where
    T: Serialize,
{
    let formatted = format_output(rows, columns, format, no_color)?;
    println!("{}", formatted);
    Ok(())
}

/// Print error message with appropriate formatting
pub fn print_error(message: &str, no_color: bool) {
    let error_msg = if no_color {
        format!("Error: {}", message)
    } else {
        format!("\x1b[31mError:\x1b[0m {}", message)
    };
    eprintln!("{}", error_msg);
}

/// Print info message with appropriate formatting
pub fn print_info(message: &str, no_color: bool) {
    let info_msg = if no_color {
        format!("Info: {}", message)
    } else {
        format!("\x1b[34mInfo:\x1b[0m {}", message)
    };
    println!("{}", info_msg);
}
