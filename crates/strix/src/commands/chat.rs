//! Chat command - interactive REPL mode.

use anyhow::Result;
use clap::Args;
use console::{Style, Term};
use futures::StreamExt;
use futures::pin_mut;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use strix_session::SessionEvent;

use super::{Context, Session};

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {}

/// Run the chat command (REPL).
pub async fn run(_args: ChatArgs, ctx: &Context) -> Result<()> {
    let session = super::build_session(ctx)?;
    let mut repl = Repl::new(session, ctx.verbose)?;
    repl.run().await
}

enum ControlFlow {
    Continue,
    Exit,
}

/// REPL state.
struct Repl {
    session: Session,
    editor: Editor<(), DefaultHistory>,
    term: Term,
    verbose: bool,
}

impl Repl {
    fn new(session: Session, verbose: bool) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();
        let editor = Editor::with_config(config)?;

        Ok(Self {
            session,
            editor,
            term: Term::stdout(),
            verbose,
        })
    }

    async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            match self.editor.readline("strix> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.handle_slash_command(line) {
                            ControlFlow::Continue => continue,
                            ControlFlow::Exit => break,
                        }
                    }

                    if let Err(e) = self.send_message(line).await {
                        self.print_error(&format!("Error: {e}"));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C cancels the line but keeps the session
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {e}"));
                    break;
                }
            }
        }

        self.print_dim("Goodbye!");
        Ok(())
    }

    async fn send_message(&mut self, message: &str) -> Result<()> {
        let stream = self
            .session
            .coordinator
            .process_message(self.session.conversation_id.clone(), message.to_string());
        pin_mut!(stream);

        while let Some(event) = stream.next().await {
            match event {
                SessionEvent::WorkflowProgress {
                    step,
                    success,
                    execution_secs,
                } if self.verbose => {
                    let status = if success { "done" } else { "failed" };
                    self.print_dim(&format!("[{step}: {status} in {execution_secs:.2}s]"));
                }
                SessionEvent::Content { text } => {
                    println!("{text}");
                    println!();
                }
                SessionEvent::Error { message } => {
                    self.print_error(&message);
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn handle_slash_command(&mut self, input: &str) -> ControlFlow {
        let cmd = input[1..].split_whitespace().next().unwrap_or("");

        match cmd {
            "quit" | "q" | "exit" => return ControlFlow::Exit,
            "help" | "h" | "?" => self.print_help(),
            "clear" | "cls" => {
                let _ = self.term.clear_screen();
            }
            "new" => {
                self.session.conversation_id = Session::new_conversation_id();
                self.print_dim("Started new conversation");
            }
            "stats" => self.print_stats(),
            "tools" => {
                for name in self.session.orchestrator.tool_names() {
                    println!("  {name}");
                }
            }
            _ => self.print_error(&format!("Unknown command: /{cmd}")),
        }

        ControlFlow::Continue
    }

    fn print_stats(&self) {
        let engine = self.session.engine.statistics();
        let orchestrator = self.session.orchestrator.statistics();
        println!("Workflow engine:");
        println!("{}", serde_json::to_string_pretty(&engine).unwrap_or_default());
        println!("Orchestrator:");
        println!(
            "{}",
            serde_json::to_string_pretty(&orchestrator).unwrap_or_default()
        );
    }

    fn print_welcome(&self) {
        println!("Strix interactive chat. Type /help for commands, /quit to exit.");
        println!();
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  /help        Show this help");
        println!("  /new         Start a new conversation");
        println!("  /tools       List registered tools");
        println!("  /stats       Show workflow and tool statistics");
        println!("  /clear       Clear the screen");
        println!("  /quit        Exit");
    }

    fn print_dim(&self, text: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(text));
    }

    fn print_error(&self, text: &str) {
        let red = Style::new().red();
        eprintln!("{}", red.apply_to(text));
    }
}
