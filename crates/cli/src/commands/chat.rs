//! `leavedesk chat`: interactive or single-question mode.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use leavedesk_assistant::{render_turn, Renderer, Session};
use leavedesk_core::message::Turn;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::bootstrap::bootstrap;

/// Prints each turn once, as it is appended.
#[derive(Default)]
struct TerminalRenderer {
    printed: usize,
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, turns: &[Turn]) {
        for turn in turns.iter().skip(self.printed) {
            println!();
            for line in render_turn(turn).lines() {
                println!("  {line}");
            }
        }
        self.printed = turns.len();
        println!();
    }
}

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
    as_of: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("  Indexing documents...");
    let app = bootstrap(config_path).await?;

    let mut composer = app.composer;
    if let Some(date) = as_of {
        composer = composer.with_as_of(date);
    }

    if let Some(question) = message {
        // Single question mode
        let answer = composer.compose(&question).await?;
        println!("{}", answer.text);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          LeaveDesk HR Assistant              ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:   {}", app.config.default_provider);
    println!("  Model:      {}", app.config.default_model);
    println!("  Employees:  {}", composer.employees().len());
    println!("  Data:       {}", app.config.data.dir.display());
    println!();
    println!("  Ask about leave rules, remaining leave, or who signs off.");
    println!("  Type 'exit' or press Ctrl+D to quit.");
    println!();

    let mut session = Session::new(composer, TerminalRenderer::default());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  你 > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        session.submit(line).await;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
