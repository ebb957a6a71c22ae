//! Notification dispatch for review decisions.
//!
//! Calls return immediately. Delivery happens on a detached task and its
//! failures are logged, never reported back to the caller.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;

use crate::jobs::NotificationJob;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Notifier: Send + Sync {
    fn notify_approved(&self, user_id: i32, request_id: i32);

    fn notify_rejected(&self, user_id: i32, request_id: i32, reason: &str);
}

/// Enqueues notifications on the Postgres-backed job queue.
#[derive(Clone)]
pub struct QueueNotifier {
    storage: PostgresStorage<NotificationJob>,
    from: String,
}

impl QueueNotifier {
    pub fn new(storage: PostgresStorage<NotificationJob>, from: impl Into<String>) -> Self {
        Self {
            storage,
            from: from.into(),
        }
    }

    fn enqueue(&self, job: NotificationJob) {
        let mut storage = self.storage.clone();
        tokio::spawn(async move {
            let user_id = job.user_id;
            let request_id = job.request_id;
            match storage.push(job).await {
                Ok(_) => tracing::debug!(user_id, request_id, "Notification enqueued"),
                Err(e) => tracing::error!(
                    user_id,
                    request_id,
                    error = %e,
                    "Failed to enqueue notification"
                ),
            }
        });
    }
}

impl Notifier for QueueNotifier {
    fn notify_approved(&self, user_id: i32, request_id: i32) {
        self.enqueue(NotificationJob::approved(user_id, request_id, self.from.as_str()));
    }

    fn notify_rejected(&self, user_id: i32, request_id: i32, reason: &str) {
        self.enqueue(NotificationJob::rejected(
            user_id,
            request_id,
            reason,
            self.from.as_str(),
        ));
    }
}

/// Records notification intents in the log only.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_approved(&self, user_id: i32, request_id: i32) {
        tracing::info!(user_id, request_id, "Seller approved notification (log only)");
    }

    fn notify_rejected(&self, user_id: i32, request_id: i32, reason: &str) {
        tracing::info!(
            user_id,
            request_id,
            reason,
            "Seller rejected notification (log only)"
        );
    }
}
