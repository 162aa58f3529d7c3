//! Usage logging collaborator.
//!
//! The HTTP layer reports each successful classification to a sink. The
//! default sink only emits a tracing event; persistent storage lives outside
//! this service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use cardsense_classify::Category;

/// One successful classification.
#[derive(Debug, Clone, Serialize)]
pub struct UsageEvent {
    pub request_id: String,
    pub analysis_type: String,
    pub suggested_category: Category,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// Receiver for usage events. Implementations must not block.
pub trait UsageSink: Send + Sync {
    fn record(&self, event: &UsageEvent);
}

/// Sink that writes usage events to the `cardsense::usage` tracing target.
#[derive(Debug, Default)]
pub struct TracingUsageSink;

impl UsageSink for TracingUsageSink {
    fn record(&self, event: &UsageEvent) {
        info!(
            target: "cardsense::usage",
            request_id = %event.request_id,
            analysis_type = %event.analysis_type,
            category = %event.suggested_category,
            confidence = event.confidence,
            "classification recorded"
        );
    }
}
