//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and control the conversation rather than being
//! sent to the selector.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Remember the user's name.
    Name(String),
    /// Print the personalized greeting.
    Greet,
    /// Store a context fact (`/context key value`) or show one (`/context key`).
    Context { key: String, value: Option<String> },
    /// Show the conversation summary.
    Summary,
    /// Show the messages received so far.
    History,
    /// Forget the conversation so far.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim().to_string());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/name" => match arg {
            Some(name) if !name.is_empty() => Some(ChatCommand::Name(name)),
            _ => Some(ChatCommand::Unknown("/name requires a name".to_string())),
        },
        "/greet" => Some(ChatCommand::Greet),
        "/context" => match arg.filter(|a| !a.is_empty()) {
            Some(arg) => Some(match arg.split_once(' ') {
                Some((key, value)) => ChatCommand::Context {
                    key: key.to_string(),
                    value: Some(value.trim().to_string()),
                },
                None => ChatCommand::Context {
                    key: arg.to_string(),
                    value: None,
                },
            }),
            None => Some(ChatCommand::Unknown("/context requires a key".to_string())),
        },
        "/summary" | "/stats" => Some(ChatCommand::Summary),
        "/history" => Some(ChatCommand::History),
        "/clear" | "/reset" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Command names and descriptions, in help order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show this help message"),
    ("/name", "Tell me your name"),
    ("/greet", "Say hello"),
    ("/context", "Set or show a conversation fact"),
    ("/summary", "Summarize the conversation"),
    ("/history", "Show messages so far"),
    ("/clear", "Forget the conversation"),
    ("/exit", "End the chat session"),
];

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, about) in COMMANDS {
        println!("  {} {about}", style(format!("{name:<9}")).cyan());
    }
    println!();
    println!(
        "  {}",
        style(r#"Lines like {"message": "...", "analysis": {...}} carry an analysis bundle"#).dim()
    );
    println!();
}
