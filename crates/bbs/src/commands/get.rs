//! `bbs get` -- the effective value of one attribute.

use anyhow::Result;

use bbs_core::AttributeId;

use crate::cli::GetArgs;
use crate::context::RuntimeContext;
use crate::output::{AttributeView, format_value, output_json};

/// Execute the `bbs get` command.
///
/// Prints only the value so the output can be used in scripts; `-` stands
/// for an attribute that is defined nowhere in the chain.
pub fn run(ctx: &RuntimeContext, args: &GetArgs) -> Result<()> {
    let attribute: AttributeId = args.attribute.parse()?;
    let strategy = ctx.load_strategy()?;
    let tree = &strategy.tree;

    let resolved = tree.resolve(&args.step, &attribute)?;

    if ctx.json {
        let operation = tree.effective_operation(&args.step)?;
        let kind = match &attribute {
            AttributeId::OperationAttribute(key) => operation
                .and_then(|op| op.schema().kind_of(key))
                .map(|k| k.to_string())
                .unwrap_or_default(),
            fixed => fixed.fixed_kind().map(|k| k.to_string()).unwrap_or_default(),
        };
        let view = AttributeView::new(attribute.parameter_key_for(operation), kind, &resolved);
        output_json(&view);
        return Ok(());
    }

    println!("{}", format_value(&attribute, resolved.value()));
    Ok(())
}
