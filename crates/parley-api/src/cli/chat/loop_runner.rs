//! Main chat loop orchestration.
//!
//! Reads lines from stdin, routes slash commands, sends everything else to
//! the selector, and prints the conversation summary on exit.

use std::io::Write;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use parley_core::reply::selector::ResponseSelector;
use parley_types::chat::ConversationTurn;
use parley_types::config::ParleyConfig;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use super::commands::{self, ChatCommand};
use super::input::{ChatLine, classify};
use crate::cli::build_selector;

/// Run the interactive chat loop on stdin.
pub async fn run_chat_loop(config: &ParleyConfig, json: bool) -> Result<()> {
    let mut selector = build_selector(config);

    if !json {
        print_banner(config.seed);
        println!("  {} {}", style("parley>").cyan().bold(), selector.personalized_greeting());
        println!();
    }

    let stdin = BufReader::new(tokio::io::stdin());
    drive(&mut selector, stdin, json).await?;

    print_summary(&selector, json);
    info!(turns = selector.history().len(), "Chat session ended");
    Ok(())
}

/// Process lines until EOF or `/exit`.
pub async fn drive<R>(selector: &mut ResponseSelector, reader: R, json: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        if !json {
            print!("  {} ", style("you>").green().bold());
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            if !json {
                println!();
            }
            break;
        };

        match classify(&line) {
            ChatLine::Blank => continue,
            ChatLine::Message { text, analysis } => {
                let reply = selector.generate_response_json(&text, analysis.as_ref());
                if json {
                    println!("{}", json!({ "reply": reply }));
                } else {
                    println!("  {} {reply}", style("parley>").cyan().bold());
                    println!();
                }
            }
            ChatLine::Command(ChatCommand::Exit) => break,
            ChatLine::Command(ChatCommand::Unknown(cmd)) => {
                eprintln!(
                    "  {} Unknown command: {cmd} (try /help)",
                    style("!").yellow().bold()
                );
            }
            ChatLine::Command(command) => {
                apply_command(selector, &command);
                if json {
                    if let Some(event) = command_json(&command, selector) {
                        println!("{event}");
                    }
                } else {
                    print_command(&command, selector);
                }
            }
        }
    }

    Ok(())
}

fn apply_command(selector: &mut ResponseSelector, command: &ChatCommand) {
    match command {
        ChatCommand::Name(name) => selector.set_user_name(name.clone()),
        ChatCommand::Context {
            key,
            value: Some(value),
        } => selector.set_context(key.clone(), value.clone()),
        ChatCommand::Clear => selector.clear_history(),
        _ => {}
    }
}

fn print_command(command: &ChatCommand, selector: &ResponseSelector) {
    match command {
        ChatCommand::Help => commands::print_help(),
        ChatCommand::Name(_) | ChatCommand::Greet => {
            println!("  {} {}", style("parley>").cyan().bold(), selector.personalized_greeting());
        }
        ChatCommand::Context { key, .. } => match selector.context_value(key) {
            Some(value) => println!("  {} {value}", style(format!("{key}:")).bold()),
            None => println!("  {}", style(format!("{key} is not set.")).dim()),
        },
        ChatCommand::Summary => print_summary(selector, false),
        ChatCommand::History if selector.history().is_empty() => {
            println!("  {}", style("No messages yet.").dim());
        }
        ChatCommand::History => println!("{}", history_table(selector.history())),
        ChatCommand::Clear => println!("  {}", style("Conversation cleared.").dim()),
        ChatCommand::Exit | ChatCommand::Unknown(_) => {}
    }
}

/// One JSON line describing a command's effect, for `--json` sessions.
fn command_json(command: &ChatCommand, selector: &ResponseSelector) -> Option<Value> {
    let event = match command {
        ChatCommand::Help => {
            let listed: Vec<Value> = commands::COMMANDS
                .iter()
                .map(|(name, about)| json!({ "command": name, "description": about }))
                .collect();
            json!({ "commands": listed })
        }
        ChatCommand::Name(_) | ChatCommand::Greet => {
            json!({ "greeting": selector.personalized_greeting() })
        }
        ChatCommand::Context { key, .. } => {
            json!({ "key": key, "value": selector.context_value(key) })
        }
        ChatCommand::Summary => json!({ "summary": selector.conversation_summary() }),
        ChatCommand::History => json!({ "history": selector.history() }),
        ChatCommand::Clear => json!({ "cleared": true }),
        ChatCommand::Exit | ChatCommand::Unknown(_) => return None,
    };
    Some(event)
}

fn print_banner(seed: Option<u64>) {
    println!();
    println!("  {} {}", style("*").cyan(), style("Parley").cyan().bold());
    if let Some(seed) = seed {
        println!("  {}  {}", style("Seed:").bold(), style(seed).dim());
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

fn print_summary(selector: &ResponseSelector, json: bool) {
    let summary = selector.conversation_summary();
    if json {
        println!("{}", json!({ "summary": summary }));
    } else {
        println!("  {} {summary}", style("Summary:").bold());
    }
}

/// Render turns as a table of time, intent and message.
pub fn history_table(turns: &[ConversationTurn]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Intent").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for (i, turn) in turns.iter().enumerate() {
        let intent_cell = match turn.recorded_intent() {
            Some(intent) => Cell::new(intent).fg(Color::Cyan),
            None => Cell::new("-").fg(Color::DarkGrey),
        };

        let message = if turn.user_message.chars().count() > 60 {
            let head: String = turn.user_message.chars().take(57).collect();
            format!("{head}...")
        } else {
            turn.user_message.clone()
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(turn.timestamp.format("%H:%M:%S").to_string()).fg(Color::DarkGrey),
            intent_cell,
            Cell::new(message),
        ]);
    }

    table
}
