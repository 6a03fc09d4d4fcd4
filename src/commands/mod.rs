/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`     - Interactive chat loop against the active session
- `sessions` - List and delete persisted chat sessions
- `models`   - Inspect the configured model set

These handlers are intentionally small and use the library components:
the session store, the session manager, and the Ollama client.
*/

// Interactive chat loop
pub mod chat;

// Model inspection
pub mod models;

// Non-interactive session management
pub mod sessions;

// Slash-command parser for the chat loop
pub mod special_commands;
