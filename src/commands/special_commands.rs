//! Special commands parser for interactive chat
//!
//! This module parses the slash commands available during an
//! interactive chat session. Special commands manage sessions and the
//! active model rather than being sent to the generation backend:
//! - Create, list, switch to, and delete chat sessions
//! - Show or switch the active model
//! - Display status and help
//! - Exit the session
//!
//! Commands are prefixed with `/`.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new chat session and make it active
    NewChat,

    /// List all chat sessions
    ListChats,

    /// Switch the active session (by list index or id prefix)
    Switch(String),

    /// Delete a session (by list index or id prefix)
    Delete(String),

    /// Show the active model and the configured model set
    ShowModel,

    /// Switch the active model
    SwitchModel(String),

    /// Display session, model, and backend status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; process as a prompt
    None,
}

/// Parse a line of input into a special command
///
/// Input not starting with `/` is a regular prompt (`SpecialCommand::None`),
/// except the bare words `exit` and `quit`.
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    // The command word is case-insensitive; arguments keep their casing.
    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower, ""),
    };

    match word.as_str() {
        "/new" => Ok(SpecialCommand::NewChat),
        "/chats" | "/list" => Ok(SpecialCommand::ListChats),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/quit" | "/exit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        "/model" => {
            if arg.is_empty() {
                Ok(SpecialCommand::ShowModel)
            } else {
                Ok(SpecialCommand::SwitchModel(arg.to_string()))
            }
        }
        "/switch" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/switch".to_string(),
                    usage: "/switch <index|id>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Switch(arg.to_string()))
            }
        }
        "/delete" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/delete".to_string(),
                    usage: "/delete <index|id>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Delete(arg.to_string()))
            }
        }
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for all special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

SESSIONS:
  /new            - Start a new chat session
  /chats          - List chat sessions (also: /list)
  /switch <n|id>  - Switch to a session by list index or id prefix
  /delete <n|id>  - Delete a session (the last one cannot be deleted)

MODEL:
  /model          - Show the active model and the configured set
  /model <name>   - Switch the active model

OTHER:
  /status         - Show session, model, and backend status
  /help, /?       - Show this help
  /quit, /exit    - Leave the chat (also: exit, quit)

Anything else is sent to the model as a prompt.
Press Ctrl-C while a reply is generating to stop that turn.
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_chat() {
        assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
    }

    #[test]
    fn test_parse_list_variants() {
        assert_eq!(parse_special_command("/chats").unwrap(), SpecialCommand::ListChats);
        assert_eq!(parse_special_command("/list").unwrap(), SpecialCommand::ListChats);
    }

    #[test]
    fn test_parse_switch_with_argument() {
        assert_eq!(
            parse_special_command("/switch 2").unwrap(),
            SpecialCommand::Switch("2".to_string())
        );
        assert_eq!(
            parse_special_command("/switch 7d4a12bc").unwrap(),
            SpecialCommand::Switch("7d4a12bc".to_string())
        );
    }

    #[test]
    fn test_parse_switch_missing_argument() {
        let err = parse_special_command("/switch").unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { .. }));
    }

    #[test]
    fn test_parse_delete_with_argument() {
        assert_eq!(
            parse_special_command("/delete 1").unwrap(),
            SpecialCommand::Delete("1".to_string())
        );
    }

    #[test]
    fn test_parse_delete_missing_argument() {
        let err = parse_special_command("/delete").unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { .. }));
    }

    #[test]
    fn test_parse_model_show_and_switch() {
        assert_eq!(parse_special_command("/model").unwrap(), SpecialCommand::ShowModel);
        assert_eq!(
            parse_special_command("/model llama3:8b").unwrap(),
            SpecialCommand::SwitchModel("llama3:8b".to_string())
        );
    }

    #[test]
    fn test_parse_status_help_exit() {
        assert_eq!(parse_special_command("/status").unwrap(), SpecialCommand::ShowStatus);
        assert_eq!(parse_special_command("/help").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/quit").unwrap(), SpecialCommand::Exit);
        assert_eq!(parse_special_command("exit").unwrap(), SpecialCommand::Exit);
        assert_eq!(parse_special_command("QUIT").unwrap(), SpecialCommand::Exit);
    }

    #[test]
    fn test_parse_regular_prompt_is_none() {
        assert_eq!(
            parse_special_command("what is the derivative of x^2?").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_special_command("/frobnicate").unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(_)));
    }

    #[test]
    fn test_command_word_case_insensitive() {
        assert_eq!(parse_special_command("/NEW").unwrap(), SpecialCommand::NewChat);
        assert_eq!(
            parse_special_command("/Switch 2").unwrap(),
            SpecialCommand::Switch("2".to_string())
        );
        assert_eq!(
            parse_special_command("/DELETE 7d4a12bc").unwrap(),
            SpecialCommand::Delete("7d4a12bc".to_string())
        );
        assert_eq!(
            parse_special_command("/Model llama3:8b").unwrap(),
            SpecialCommand::SwitchModel("llama3:8b".to_string())
        );
    }

    #[test]
    fn test_argument_casing_preserved() {
        assert_eq!(
            parse_special_command("/model DeepSeek-R1:7B").unwrap(),
            SpecialCommand::SwitchModel("DeepSeek-R1:7B".to_string())
        );
    }
}
