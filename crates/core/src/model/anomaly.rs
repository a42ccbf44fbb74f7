use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A day whose credit burn deviated from baseline; `z_score` is computed upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Anomaly {
    pub day: NaiveDate,
    pub credits_used: f64,
    pub z_score: f64,
}
