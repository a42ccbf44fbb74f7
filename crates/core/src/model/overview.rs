use serde::{Deserialize, Serialize};

/// Headline KPIs for the current day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overview {
    pub credits_today: f64,
    pub p95_latency_today_ms: f64,
    pub anomaly_count: i64,
    pub governance_issue_count: i64,
}
