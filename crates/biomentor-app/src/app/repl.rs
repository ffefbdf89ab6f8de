use anyhow::Result;
use biomentor_chat::{outcome_kind, outcome_text, ChatSession, ReplyKind};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::app::AppConfig;

/// Line typed at the prompt, classified
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Exit,
    SetKey(Option<&'a str>),
    History,
    Help,
    Ask(&'a str),
}

fn parse_line(line: &str) -> Option<ReplCommand<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    Some(match line {
        "exit" | "quit" => ReplCommand::Exit,
        "/history" => ReplCommand::History,
        "/help" => ReplCommand::Help,
        "/key" => ReplCommand::SetKey(None),
        _ => match line.strip_prefix("/key ") {
            Some(key) if !key.trim().is_empty() => ReplCommand::SetKey(Some(key.trim())),
            Some(_) => ReplCommand::SetKey(None),
            None => ReplCommand::Ask(line),
        },
    })
}

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  /key <value>   - Set the API key for this session");
    println!("  /key           - Clear the API key");
    println!("  /history       - Show the conversation, newest first");
    println!("  exit | quit    - Leave");
}

fn print_history(session: &ChatSession) {
    let transcript = session.transcript_newest_first();
    if transcript.is_empty() {
        println!("{} No messages yet", "ℹ️".bright_blue());
        return;
    }
    for entry in transcript {
        println!("{} {}", "BOT:".bright_blue().bold(), entry.reply);
        println!("{} {}\n", "YOU:".bright_green().bold(), entry.user_text);
    }
}

/// Run interactive REPL mode
pub async fn run_repl_mode(app_config: AppConfig) -> Result<()> {
    let generator = app_config.generator;
    let mut session = ChatSession::with_api_key(app_config.chat.default_api_key);

    println!("{}", "🧬 Biology Mentor".bright_cyan().bold());
    println!("{}", format!("Model: {}", generator.model()).bright_black());
    println!("{}", "Ask a biology question. Type '/help' for commands, 'exit' to quit.\n".bright_black());
    if !session.has_api_key() {
        println!("{} {}", "🔑".yellow(), "Set your API key with /key <value>".bright_black());
    }

    let mut rl = DefaultEditor::new()?;

    // Token of the reply currently being generated, cancelled by Ctrl-C
    let current_token: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));
    let current_token_for_handler = current_token.clone();

    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_ok() {
                if let Ok(guard) = current_token_for_handler.lock() {
                    if let Some(ref token) = *guard {
                        println!("\n{}", "^C - Interrupting...".bright_yellow());
                        token.cancel();
                    }
                }
            }
        }
    });

    loop {
        let readline = rl.readline(&format!("{} ", "YOU:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let Some(command) = parse_line(&line) else {
                    continue;
                };

                match command {
                    ReplCommand::Exit => {
                        println!("{}", "Goodbye!".bright_cyan());
                        break;
                    }
                    ReplCommand::Help => print_help(),
                    ReplCommand::History => print_history(&session),
                    ReplCommand::SetKey(key) => {
                        session.set_api_key(key.map(String::from));
                        if session.has_api_key() {
                            println!("{} API key set", "🔑".bright_green());
                        } else {
                            println!("{} API key cleared", "🔑".bright_yellow());
                        }
                    }
                    ReplCommand::Ask(question) => {
                        rl.add_history_entry(question)?;
                        session.set_pending_input(question);

                        let cancel_token = CancellationToken::new();
                        if let Ok(mut guard) = current_token.lock() {
                            *guard = Some(cancel_token.clone());
                        }

                        let result = generator.respond(&mut session, &cancel_token).await;

                        if let Ok(mut guard) = current_token.lock() {
                            *guard = None;
                        }

                        match result {
                            Ok(Some(outcome)) => {
                                let label = match outcome_kind(&outcome) {
                                    ReplyKind::Answer => "BOT:".bright_blue().bold(),
                                    ReplyKind::Refusal => "BOT:".bright_yellow().bold(),
                                    ReplyKind::Error => "BOT:".bright_red().bold(),
                                };
                                println!("\n{} {}\n", label, outcome_text(&outcome));
                            }
                            Ok(None) => {}
                            Err(e) => eprintln!("{} {}", "Error:".bright_red().bold(), e),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}
