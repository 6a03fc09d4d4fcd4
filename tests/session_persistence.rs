use async_trait::async_trait;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use companion::backend::GenerationBackend;
use companion::error::Result;
use companion::session::{SessionManager, TurnOutcome};
use companion::store::SessionStore;

struct CannedBackend {
    reply: String,
}

#[async_trait]
impl GenerationBackend for CannedBackend {
    async fn generate(&self, _prompt: &str, _model: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

fn store_at(dir: &TempDir) -> SessionStore {
    SessionStore::new_with_path(dir.path().join("chats.json")).unwrap()
}

/// A turn persisted by one process is visible to the next one.
#[tokio::test]
async fn test_turn_survives_reload() {
    let dir = TempDir::new().unwrap();

    let manager_id = {
        let mut manager = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
        let backend = CannedBackend {
            reply: "four".to_string(),
        };
        let outcome = manager
            .submit("what is 2 + 2", &backend, &CancellationToken::new())
            .await
            .unwrap();
        match outcome {
            TurnOutcome::Completed { reply, .. } => assert_eq!(reply, "four"),
            TurnOutcome::Cancelled => panic!("turn was cancelled"),
        }
        manager.active_id().to_string()
    };

    let manager = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    let session = manager.active_session().unwrap();
    assert_eq!(session.id, manager_id);
    assert_eq!(session.title, "what is 2 + 2");
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].content, "what is 2 + 2");
    assert_eq!(session.messages[1].content, "four");
    assert!(session.messages[1].elapsed_seconds.is_some());
}

/// Saving what was just loaded does not change the file.
#[test]
fn test_save_load_fixed_point() {
    let dir = TempDir::new().unwrap();
    let store = store_at(&dir);

    let mut manager = SessionManager::open(store, "qwen2.5:3b").unwrap();
    manager.new_session().unwrap();
    manager.new_session().unwrap();

    let before = std::fs::read_to_string(dir.path().join("chats.json")).unwrap();

    let store = store_at(&dir);
    let sessions = store.load().unwrap();
    store.save(&sessions).unwrap();

    let after = std::fs::read_to_string(dir.path().join("chats.json")).unwrap();
    assert_eq!(before, after);
}

/// Session order is most recent first and survives a reload.
#[test]
fn test_ordering_survives_reload() {
    let dir = TempDir::new().unwrap();

    let newest = {
        let mut manager = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
        manager.new_session().unwrap();
        manager.new_session().unwrap();
        manager.sessions()[0].id.clone()
    };

    let manager = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    assert_eq!(manager.sessions().len(), 3);
    assert_eq!(manager.sessions()[0].id, newest);
}

/// Deleting the active session moves the pointer to the most recent
/// survivor, and a fresh open lands on that survivor too.
#[test]
fn test_delete_active_session_repairs_pointer() {
    let dir = TempDir::new().unwrap();

    let mut manager = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    manager.new_session().unwrap();
    manager.new_session().unwrap();
    let doomed = manager.active_id().to_string();

    assert!(manager.delete(&doomed).unwrap());
    assert_ne!(manager.active_id(), doomed);
    assert_eq!(manager.active_id(), manager.sessions()[0].id);

    let reopened = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    assert_eq!(reopened.sessions().len(), 2);
    assert!(reopened.sessions().iter().all(|s| s.id != doomed));
}

/// The last session cannot be deleted.
#[test]
fn test_last_session_is_kept() {
    let dir = TempDir::new().unwrap();

    let mut manager = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    let only = manager.active_id().to_string();

    assert!(!manager.delete(&only).unwrap());
    assert_eq!(manager.sessions().len(), 1);

    let reopened = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    assert_eq!(reopened.sessions().len(), 1);
    assert_eq!(reopened.active_id(), only);
}

/// A cancelled turn keeps the user message on disk but records no
/// assistant reply.
#[tokio::test]
async fn test_cancelled_turn_keeps_prompt_only() {
    let dir = TempDir::new().unwrap();

    let mut manager = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    let backend = CannedBackend {
        reply: "never shown".to_string(),
    };
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = manager.submit("stop me", &backend, &cancel).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Cancelled));

    let reopened = SessionManager::open(store_at(&dir), "qwen2.5:3b").unwrap();
    let session = reopened.active_session().unwrap();
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].content, "stop me");
    assert_eq!(session.title, "stop me");
}
