//! Session management commands
//!
//! Non-interactive listing and deletion of persisted chat sessions.

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionManager;
use crate::store::SessionStore;

use prettytable::{row, Table};

/// List persisted chat sessions in table format
pub fn list_sessions(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let sessions = store.load()?;

    if sessions.is_empty() {
        println!("No chat sessions yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["Id", "Title", "Created", "Messages"]);
    for session in &sessions {
        table.add_row(row![
            short_id(&session.id),
            session.title,
            session.created_at,
            session.messages.len()
        ]);
    }

    println!();
    table.printstd();
    println!();
    Ok(())
}

/// Delete a chat session by id or unique id prefix
pub fn delete_session(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config)?;
    let mut manager = SessionManager::open(store, config.chat.default_model.clone())?;

    let full_id = manager.resolve_id(id)?;
    if manager.delete(&full_id)? {
        println!("Deleted session {}", short_id(&full_id));
    } else {
        println!("The last remaining session cannot be deleted.");
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<SessionStore> {
    match &config.storage.chat_file {
        Some(path) => SessionStore::new_with_path(path),
        None => SessionStore::new(),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
