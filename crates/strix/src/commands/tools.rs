//! Tools command - list the registered tools.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the tools command.
#[derive(Args, Debug)]
pub struct ToolsArgs {}

/// Run the tools command.
pub async fn run(_args: ToolsArgs, ctx: &Context) -> Result<()> {
    let session = super::build_session(ctx)?;
    let names = session.orchestrator.tool_names();

    if ctx.json_output {
        println!("{}", serde_json::to_string(&names)?);
        return Ok(());
    }

    for name in names {
        println!("{name}");
    }
    Ok(())
}
