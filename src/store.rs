use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::draft::EmailDraft;

/// At most one pending draft per user. The trait is async so a durable
/// backend can replace the in-memory one without touching the confirmation
/// handler.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Stores a draft, replacing any existing one for the same user.
    /// Returns the replaced draft so the caller can notify the user.
    async fn put(&self, user: u64, draft: EmailDraft) -> Option<EmailDraft>;

    async fn get(&self, user: u64) -> Option<EmailDraft>;

    /// Atomically takes the draft out of the store. `None` for absent keys;
    /// never an error. The atomic take is what limits a confirmation to a
    /// single dispatch even if the control fires twice.
    async fn remove(&self, user: u64) -> Option<EmailDraft>;
}

#[derive(Default)]
pub struct InMemoryDraftStore {
    drafts: Mutex<HashMap<u64, EmailDraft>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn put(&self, user: u64, draft: EmailDraft) -> Option<EmailDraft> {
        self.drafts.lock().unwrap().insert(user, draft)
    }

    async fn get(&self, user: u64) -> Option<EmailDraft> {
        self.drafts.lock().unwrap().get(&user).cloned()
    }

    async fn remove(&self, user: u64) -> Option<EmailDraft> {
        self.drafts.lock().unwrap().remove(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(subject: &str) -> EmailDraft {
        EmailDraft {
            subject: subject.to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = InMemoryDraftStore::new();
        store.put(1, draft("for A")).await;
        assert_eq!(store.get(2).await, None);
        assert_eq!(store.get(1).await.unwrap().subject, "for A");
    }

    #[tokio::test]
    async fn second_put_overwrites_and_returns_previous() {
        let store = InMemoryDraftStore::new();
        assert_eq!(store.put(7, draft("first")).await, None);
        let replaced = store.put(7, draft("second")).await.unwrap();
        assert_eq!(replaced.subject, "first");
        assert_eq!(store.get(7).await.unwrap().subject, "second");
    }

    #[tokio::test]
    async fn remove_takes_the_draft_and_is_idempotent() {
        let store = InMemoryDraftStore::new();
        store.put(3, draft("once")).await;
        assert_eq!(store.remove(3).await.unwrap().subject, "once");
        assert_eq!(store.remove(3).await, None);
        assert_eq!(store.get(3).await, None);
    }
}
