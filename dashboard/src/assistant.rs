//! Reply suggestions for the Email and WhatsApp screens
//!
//! There is no inference service. `CannedReplies` answers with a random
//! stock reply after a delay, under the same cancellation as the screen
//! that asked.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{DashboardError, DashboardResult};

const STOCK_REPLIES: &[&str] = &[
    "Thanks for reaching out! I'll get back to you with details shortly.",
    "Happy to help. Could you share a couple of times that work for a quick call?",
    "Thanks for the update. I've passed this on to the team.",
    "Great question. I'll send over the pricing sheet today.",
    "Appreciate your patience, we're looking into it now.",
];

#[async_trait]
pub trait ReplySuggester: Send + Sync {
    /// Suggests a reply to `message`
    async fn suggest(&self, message: &str, cancel: &CancellationToken) -> DashboardResult<String>;
}

#[derive(Debug, Clone)]
pub struct CannedReplies {
    replies: Vec<String>,
    delay: Duration,
}

impl CannedReplies {
    pub fn new(replies: Vec<String>, delay: Duration) -> Self {
        Self { replies, delay }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self::new(STOCK_REPLIES.iter().map(|r| r.to_string()).collect(), delay)
    }
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self::with_delay(Duration::from_millis(1500))
    }
}

#[async_trait]
impl ReplySuggester for CannedReplies {
    async fn suggest(&self, message: &str, cancel: &CancellationToken) -> DashboardResult<String> {
        debug!(chars = message.chars().count(), "suggesting reply");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(DashboardError::Cancelled("reply suggestion".to_string()));
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        self.replies
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| DashboardError::InvalidInput("no canned replies configured".to_string()))
    }
}
