use crate::mailer::MailTransport;
use crate::store::DraftStore;

/// Terminal outcome of a confirmation. The draft is gone from the store in
/// every variant, including `NothingToSend` (where it was never there).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Sent,
    Failed,
    NothingToSend,
}

impl ConfirmOutcome {
    pub fn user_text(self) -> &'static str {
        match self {
            ConfirmOutcome::Sent => "✅ Email sent.",
            ConfirmOutcome::Failed => {
                "❌ The email could not be sent. Draft it again with /mail to retry."
            }
            ConfirmOutcome::NothingToSend => {
                "Nothing to send — draft an email with /mail first."
            }
        }
    }
}

/// Runs one confirmation: take the user's draft, dispatch it, report.
///
/// The draft is taken out of the store before dispatching, so a stale or
/// repeated control activation finds nothing and never reaches the relay.
/// A failed send is not retried; the user re-issues /mail.
pub async fn confirm_send(
    store: &dyn DraftStore,
    mailer: &dyn MailTransport,
    user: u64,
) -> ConfirmOutcome {
    let Some(draft) = store.remove(user).await else {
        log::debug!("confirmation from user {user} with no pending draft");
        return ConfirmOutcome::NothingToSend;
    };

    match mailer.send_draft(&draft).await {
        Ok(()) => {
            log::info!("email '{}' sent for user {user}", draft.subject);
            ConfirmOutcome::Sent
        }
        Err(e) => {
            // Detail stays in the operator log; the user gets a generic notice.
            log::error!("email dispatch failed for user {user}: {e}");
            ConfirmOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::EmailDraft;
    use crate::mailer::DispatchError;
    use crate::store::InMemoryDraftStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMailer {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingMailer {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MailTransport for CountingMailer {
        async fn send_draft(&self, _draft: &EmailDraft) -> Result<(), DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                // A builder with no sender reliably produces a message error.
                let err = lettre::Message::builder().body(String::new()).unwrap_err();
                Err(DispatchError::Message(err))
            } else {
                Ok(())
            }
        }
    }

    fn draft() -> EmailDraft {
        EmailDraft {
            subject: "Budget Review".to_string(),
            body: "Please see attached numbers.".to_string(),
        }
    }

    #[tokio::test]
    async fn success_dispatches_once_and_clears_the_store() {
        let store = InMemoryDraftStore::new();
        let mailer = CountingMailer::new(false);
        store.put(1, draft()).await;

        let outcome = confirm_send(&store, &mailer, 1).await;
        assert_eq!(outcome, ConfirmOutcome::Sent);
        assert_eq!(mailer.calls(), 1);
        assert_eq!(store.get(1).await, None);
    }

    #[tokio::test]
    async fn failure_still_clears_the_store() {
        let store = InMemoryDraftStore::new();
        let mailer = CountingMailer::new(true);
        store.put(1, draft()).await;

        let outcome = confirm_send(&store, &mailer, 1).await;
        assert_eq!(outcome, ConfirmOutcome::Failed);
        assert_eq!(mailer.calls(), 1);
        assert_eq!(store.get(1).await, None);
    }

    #[tokio::test]
    async fn second_activation_hits_the_guard() {
        let store = InMemoryDraftStore::new();
        let mailer = CountingMailer::new(false);
        store.put(1, draft()).await;

        assert_eq!(confirm_send(&store, &mailer, 1).await, ConfirmOutcome::Sent);
        assert_eq!(
            confirm_send(&store, &mailer, 1).await,
            ConfirmOutcome::NothingToSend
        );
        assert_eq!(mailer.calls(), 1);
    }

    #[tokio::test]
    async fn confirmation_without_a_draft_never_dispatches() {
        let store = InMemoryDraftStore::new();
        let mailer = CountingMailer::new(false);

        let outcome = confirm_send(&store, &mailer, 42).await;
        assert_eq!(outcome, ConfirmOutcome::NothingToSend);
        assert_eq!(mailer.calls(), 0);
    }

    #[tokio::test]
    async fn confirmation_only_touches_the_activating_user() {
        let store = InMemoryDraftStore::new();
        let mailer = CountingMailer::new(false);
        store.put(1, draft()).await;
        store.put(2, draft()).await;

        confirm_send(&store, &mailer, 1).await;
        assert!(store.get(2).await.is_some());
    }
}
