//! Output formatting helpers for the `bbs` CLI.

use std::io::{self, Write};

use serde::Serialize;

use bbs_core::{AttributeId, AttributeValue, OperationKind, Value};
use bbs_tree::{ResolvedAttribute, ResolvedValue};
use bbs_ui::styles::{render_muted, render_state, render_state_icon, state_label};

/// JSON view of one resolved attribute.
#[derive(Serialize)]
pub struct AttributeView {
    /// Parameter key as written in strategy files.
    pub key: String,
    pub kind: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Step that defines an inherited value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl AttributeView {
    pub fn new(key: String, kind: String, resolved: &ResolvedValue<Value>) -> Self {
        Self {
            key,
            kind,
            state: state_label(resolved.state()),
            value: resolved.value().map(Value::to_string),
            from: resolved.source().map(str::to_string),
        }
    }

    pub fn from_row(row: &ResolvedAttribute, operation: Option<OperationKind>) -> Self {
        Self::new(
            row.attribute.parameter_key_for(operation),
            row.kind.to_string(),
            &row.resolved,
        )
    }
}

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a simple table with headers and rows, columns padded to fit.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let line = |cells: &mut dyn Iterator<Item = String>| {
        cells
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(&w) => format!("{:<w$}", cell, w = w),
                None => cell,
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(handle, "{}", line(&mut headers.iter().map(|h| h.to_string())));
    let _ = writeln!(handle, "{}", line(&mut widths.iter().map(|w| "-".repeat(*w))));
    for row in rows {
        let _ = writeln!(handle, "{}", line(&mut row.iter().cloned()));
    }
}

/// Text for an effective value; `(all)`/`(none)` spell out empty values.
pub fn format_value(attribute: &AttributeId, value: Option<&Value>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.is_empty() => match attribute {
            AttributeId::Sources | AttributeId::InstrumentModel | AttributeId::Baselines => "(all)".into(),
            _ => "(none)".into(),
        },
        Some(v) => v.to_string(),
    }
}

/// One `show` line: icon, key, coloured value and origin.
pub fn format_resolved_line(key: &str, width: usize, attribute: &AttributeId, resolved: &ResolvedValue<Value>) -> String {
    let state = resolved.state();
    let value = format_value(attribute, resolved.value());
    let origin = match resolved {
        ResolvedValue::Inherited { from, .. } => format!("  {}", render_muted(&format!("(from {})", from))),
        ResolvedValue::Undefined => format!("  {}", render_muted("(undefined)")),
        ResolvedValue::DefinedHere(_) => String::new(),
    };
    format!(
        "  {} {:<width$}  {}{}",
        render_state_icon(state),
        key,
        render_state(state, &value),
        origin,
        width = width
    )
}

/// Describes a stored state after a write.
pub fn describe_stored(stored: &AttributeValue<Value>) -> &'static str {
    match stored {
        AttributeValue::Unset => "inherits",
        AttributeValue::ExplicitEmpty => "set empty",
        AttributeValue::Explicit(_) => "set",
    }
}
