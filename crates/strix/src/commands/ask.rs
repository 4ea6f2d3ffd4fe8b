//! Ask command - one-shot question through the workflow engine.

use anyhow::Result;
use clap::Args;
use console::Style;
use futures::StreamExt;
use futures::pin_mut;

use strix_session::SessionEvent;

use super::Context;

/// Arguments for the ask command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question or prompt to send
    #[arg(required = true)]
    pub prompt: String,
}

/// Run the ask command.
pub async fn run(args: AskArgs, ctx: &Context) -> Result<()> {
    let session = super::build_session(ctx)?;
    let dim = Style::new().dim();

    if ctx.verbose && !ctx.json_output {
        println!(
            "{}",
            dim.apply_to(format!("Conversation: {}", session.conversation_id))
        );
        println!();
    }

    let stream = session
        .coordinator
        .process_message(session.conversation_id.clone(), args.prompt);
    pin_mut!(stream);

    while let Some(event) = stream.next().await {
        if ctx.json_output {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }

        match event {
            SessionEvent::WorkflowStart { query } => {
                if ctx.verbose {
                    println!("{}", dim.apply_to(format!("Processing: {query}")));
                }
            }
            SessionEvent::WorkflowProgress {
                step,
                success,
                execution_secs,
            } => {
                if ctx.verbose {
                    let status = if success { "done" } else { "failed" };
                    println!(
                        "{}",
                        dim.apply_to(format!("[{step}: {status} in {execution_secs:.2}s]"))
                    );
                }
            }
            SessionEvent::Content { text } => {
                println!("{text}");
            }
            SessionEvent::WorkflowSummary {
                success,
                steps_completed,
                total_execution_secs,
                ..
            } => {
                if ctx.verbose {
                    println!();
                    println!(
                        "{}",
                        dim.apply_to(format!(
                            "[workflow {}: {} steps in {:.2}s]",
                            if success { "succeeded" } else { "failed" },
                            steps_completed,
                            total_execution_secs
                        ))
                    );
                }
            }
            SessionEvent::Complete { .. } => {}
            SessionEvent::Error { message } => {
                let red = Style::new().red();
                eprintln!("{} {}", red.apply_to("Error:"), message);
                anyhow::bail!(message);
            }
        }
    }

    Ok(())
}
