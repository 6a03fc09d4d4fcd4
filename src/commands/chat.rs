//! Interactive chat mode handler
//!
//! Instantiates the session store, the Ollama client, and a
//! `SessionManager`, then runs a readline-based loop that submits user
//! input as prompts and dispatches slash commands. Ctrl-C during
//! generation cancels only the in-flight turn.

use crate::backend::OllamaClient;
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::session::{SessionManager, TurnOutcome};
use crate::store::{ChatSession, Role, SessionStore};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio_util::sync::CancellationToken;

/// Start interactive chat mode
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `model` - Optional override for the configured default model
/// * `host` - Optional override for the configured backend host
pub async fn run_chat(mut config: Config, model: Option<String>, host: Option<String>) -> Result<()> {
    tracing::info!("Starting interactive chat mode");

    if let Some(host) = host {
        config.backend.host = host;
    }
    let model = model.unwrap_or_else(|| config.chat.default_model.clone());

    let store = open_store(&config)?;
    let client = OllamaClient::new(&config.backend, config.models.clone())?;
    let mut manager = SessionManager::open(store, model)?;

    let mut rl = DefaultEditor::new()?;

    print_welcome_banner(&manager, &config);
    print_session(manager.active_session()?);

    loop {
        let prompt = format!("[{}] >> ", manager.model()).cyan().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::NewChat) => {
                        manager.new_session()?;
                        println!("{}\n", "Started a new chat.".green());
                        continue;
                    }
                    Ok(SpecialCommand::ListChats) => {
                        print_chat_list(&manager);
                        continue;
                    }
                    Ok(SpecialCommand::Switch(target)) => {
                        match resolve_target(&manager, &target) {
                            Ok(id) => {
                                manager.select(&id)?;
                                print_session(manager.active_session()?);
                            }
                            Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                        }
                        continue;
                    }
                    Ok(SpecialCommand::Delete(target)) => {
                        match resolve_target(&manager, &target) {
                            Ok(id) => {
                                if manager.delete(&id)? {
                                    println!("{}\n", "Deleted.".green());
                                } else {
                                    println!(
                                        "{}\n",
                                        "The last remaining chat cannot be deleted.".yellow()
                                    );
                                }
                            }
                            Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                        }
                        continue;
                    }
                    Ok(SpecialCommand::ShowModel) => {
                        print_model_info(&manager, &config);
                        continue;
                    }
                    Ok(SpecialCommand::SwitchModel(name)) => {
                        if !config.models.contains_key(&name) {
                            println!(
                                "{}",
                                format!(
                                    "Note: {} is not in the configured model table; default generation parameters apply.",
                                    name
                                )
                                .yellow()
                            );
                        }
                        manager.set_model(&name);
                        println!("Switched model to {}\n", name);
                        continue;
                    }
                    Ok(SpecialCommand::ShowStatus) => {
                        print_status(&manager, &config);
                        continue;
                    }
                    Ok(SpecialCommand::Help) => {
                        print_help();
                        continue;
                    }
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::None) => {
                        // Regular prompt
                    }
                    Err(e) => {
                        eprintln!("{}", format!("{}", e).red());
                        continue;
                    }
                }

                rl.add_history_entry(trimmed)?;
                run_turn(&mut manager, &client, trimmed).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                eprintln!("Readline error: {}", err);
                break;
            }
        }
    }

    Ok(())
}

/// Open the session store configured for this run
fn open_store(config: &Config) -> Result<SessionStore> {
    match &config.storage.chat_file {
        Some(path) => SessionStore::new_with_path(path),
        None => SessionStore::new(),
    }
}

/// Run one prompt/reply turn, cancellable with Ctrl-C
async fn run_turn(manager: &mut SessionManager, client: &OllamaClient, prompt: &str) {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    println!("{}", "Thinking... (Ctrl-C to stop)".dimmed());
    let result = manager.submit(prompt, client, &cancel).await;
    watcher.abort();

    match result {
        Ok(TurnOutcome::Completed {
            reply,
            elapsed_seconds,
        }) => {
            println!("\n{}\n", reply);
            println!("{}\n", format!("({:.2} seconds)", elapsed_seconds).dimmed());
        }
        Ok(TurnOutcome::Cancelled) => {
            println!("{}\n", "Generation stopped by user.".yellow());
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}\n", e).red());
        }
    }
}

/// Resolve a user-entered target (1-based list index or id prefix)
fn resolve_target(manager: &SessionManager, target: &str) -> Result<String> {
    if let Ok(index) = target.parse::<usize>() {
        if index >= 1 && index <= manager.sessions().len() {
            return Ok(manager.sessions()[index - 1].id.clone());
        }
    }
    manager.resolve_id(target)
}

fn print_welcome_banner(manager: &SessionManager, config: &Config) {
    println!();
    println!("{}", "Companion - local chat over Ollama".bold());
    println!(
        "model: {}   backend: {}   sessions: {}",
        manager.model().green(),
        config.backend.host,
        manager.sessions().len()
    );
    println!("{}", "Type /help for commands.".dimmed());
    println!();
}

fn print_chat_list(manager: &SessionManager) {
    println!();
    for (i, session) in manager.sessions().iter().enumerate() {
        let marker = if session.id == manager.active_id() {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:>2}. {}  {}  ({} messages)",
            marker,
            i + 1,
            session.title.bold(),
            session.created_at.dimmed(),
            session.messages.len()
        );
    }
    println!();
}

fn print_session(session: &ChatSession) {
    println!();
    println!("{}  {}", session.title.bold(), session.created_at.dimmed());
    for message in &session.messages {
        match message.role {
            Role::User => println!("\n{} {}", ">".cyan(), message.content),
            Role::Assistant => {
                println!("\n{}", message.content);
                if let Some(elapsed) = message.elapsed_seconds {
                    println!("{}", format!("({:.2} seconds)", elapsed).dimmed());
                }
            }
        }
    }
    println!();
}

fn print_model_info(manager: &SessionManager, config: &Config) {
    // Resolves through the same fallback the client applies.
    let active = config.params_for(manager.model());
    println!(
        "\nActive model: {}  temperature={}, num_predict={}, num_ctx={}",
        manager.model().green(),
        active.temperature,
        active.num_predict,
        active.num_ctx
    );
    println!("Configured models:");
    for (name, params) in &config.models {
        println!(
            "  {}  temperature={}, num_predict={}, num_ctx={}",
            name, params.temperature, params.num_predict, params.num_ctx
        );
    }
    println!(
        "{}\n",
        "Other model names use temperature=0.2, num_predict=120, num_ctx=2048.".dimmed()
    );
}

fn print_status(manager: &SessionManager, config: &Config) {
    let active_title = manager
        .active_session()
        .map(|s| s.title.clone())
        .unwrap_or_default();
    println!();
    println!("Model:    {}", manager.model());
    println!("Backend:  {}", config.backend.host);
    println!(
        "Sessions: {} (active: {})",
        manager.sessions().len(),
        active_title
    );
    println!();
}
