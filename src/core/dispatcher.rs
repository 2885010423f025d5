//! Sequential, paced delivery of one bulk batch.

use crate::core::grouper::combine_messages;
use crate::core::pacing::Pacer;
use crate::domain::model::{DispatchReport, GroupedMessages};
use crate::domain::ports::DeliveryTransport;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Delivers every recipient's combined payload one after another, pausing
/// between recipients. A failed recipient is logged and skipped, never retried.
pub struct BulkDispatcher {
    transport: Arc<dyn DeliveryTransport>,
    pacer: Pacer,
}

impl BulkDispatcher {
    pub fn new(transport: Arc<dyn DeliveryTransport>, pacer: Pacer) -> Self {
        Self { transport, pacer }
    }

    pub async fn run(&self, session_id: &str, groups: GroupedMessages) -> DispatchReport {
        let started_at = Utc::now();
        let recipients = groups.recipient_count();
        let mut delivered = 0;
        let mut failed = Vec::new();

        info!(
            session = %session_id,
            recipients,
            messages = groups.message_count(),
            "Starting bulk dispatch"
        );

        for (to, messages) in groups {
            let payload = combine_messages(&messages);

            match self.transport.send_message(session_id, &to, &payload).await {
                Ok(()) => {
                    delivered += 1;
                    debug!(session = %session_id, recipient = %to, messages = messages.len(), "Bulk send delivered");
                }
                Err(e) => {
                    error!(session = %session_id, recipient = %to, error = %e, "Bulk send failed");
                    failed.push(to);
                }
            }

            let delay = self.pacer.pause().await;
            debug!(session = %session_id, delay_ms = delay.as_millis() as u64, "Paced");
        }

        let report = DispatchReport {
            session: session_id.to_string(),
            recipients,
            delivered,
            failed,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            session = %session_id,
            recipients = report.recipients,
            delivered = report.delivered,
            failed = report.failed.len(),
            elapsed_ms = report.elapsed().num_milliseconds(),
            "Bulk dispatch finished"
        );

        report
    }
}
