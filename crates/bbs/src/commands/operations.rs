//! `bbs operations` -- list operations and their attribute schemas.

use anyhow::Result;

use bbs_core::OperationKind;

use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `bbs operations` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    if ctx.json {
        let operations: Vec<serde_json::Value> = OperationKind::ALL
            .iter()
            .map(|op| {
                let schema = op.schema();
                let attributes: serde_json::Map<String, serde_json::Value> = schema
                    .entries
                    .iter()
                    .map(|e| (format!("{}.{}", op.prefix(), e.key), e.kind.to_string().into()))
                    .collect();
                serde_json::json!({
                    "operation": op.as_str(),
                    "attributes": attributes,
                })
            })
            .collect();
        output_json(&operations);
        return Ok(());
    }

    let mut rows = Vec::new();
    for op in OperationKind::ALL.iter() {
        let schema = op.schema();
        if schema.is_empty() {
            rows.push(vec![op.as_str().to_string(), "-".to_string(), String::new()]);
        }
        for entry in schema.entries {
            rows.push(vec![
                op.as_str().to_string(),
                format!("{}.{}", op.prefix(), entry.key),
                entry.kind.to_string(),
            ]);
        }
    }
    output_table(&["OPERATION", "ATTRIBUTE", "KIND"], &rows);
    Ok(())
}
