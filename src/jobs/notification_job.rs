//! Seller notification background job.
//!
//! Jobs are enqueued after a review decision commits and delivered by the
//! `jobs work` worker, which writes each message to the log.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// What happened to the seller's application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    SellerApproved,
    SellerRejected { reason: String },
}

/// Notification job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub user_id: i32,
    pub request_id: i32,
    #[serde(flatten)]
    pub kind: NotificationKind,
    /// Sender address
    pub from: String,
}

impl NotificationJob {
    pub fn approved(user_id: i32, request_id: i32, from: impl Into<String>) -> Self {
        Self {
            user_id,
            request_id,
            kind: NotificationKind::SellerApproved,
            from: from.into(),
        }
    }

    pub fn rejected(
        user_id: i32,
        request_id: i32,
        reason: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            request_id,
            kind: NotificationKind::SellerRejected {
                reason: reason.into(),
            },
            from: from.into(),
        }
    }

    pub fn subject(&self) -> &'static str {
        match self.kind {
            NotificationKind::SellerApproved => "Your seller application was approved",
            NotificationKind::SellerRejected { .. } => "Your seller application was not approved",
        }
    }

    pub fn body(&self) -> String {
        match &self.kind {
            NotificationKind::SellerApproved => format!(
                "Application #{} has been approved. You can now list products in the marketplace.",
                self.request_id
            ),
            NotificationKind::SellerRejected { reason } => format!(
                "Application #{} was rejected.\nReason: {}\nYou may submit a new application.",
                self.request_id, reason
            ),
        }
    }
}

/// Notification job handler
///
/// Delivery to the seller is a log record; the job is acknowledged once written.
pub async fn notification_job_handler(job: NotificationJob) -> Result<(), AppError> {
    tracing::info!(
        user_id = job.user_id,
        request_id = job.request_id,
        from = %job.from,
        subject = job.subject(),
        "=== NOTIFICATION ===\n{}",
        job.body()
    );

    Ok(())
}
