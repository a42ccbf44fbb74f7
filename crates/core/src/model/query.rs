use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::series::Sample;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryHistory {
    pub id: i64,
    pub query_id: String,
    pub warehouse_name: String,
    pub user_name: String,
    pub role_name: String,
    pub start_time: String,
    pub end_time: String,
    pub total_elapsed_ms: i64,
    pub bytes_scanned: i64,
    pub rows_produced: i64,
    pub query_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatencyPoint {
    pub day: NaiveDate,
    pub p95_ms: f64,
}

impl LatencyPoint {
    pub fn sample(&self) -> Sample {
        Sample::new(self.day.to_string(), self.p95_ms)
    }
}

/// A warehouse whose recent p95 latency moved against the previous window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRegression {
    pub warehouse_name: String,
    pub p95_prev_ms: f64,
    pub p95_recent_ms: f64,
    pub delta_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpensiveQuery {
    pub query_id: String,
    pub warehouse_name: String,
    pub total_elapsed_ms: i64,
    pub bytes_scanned: i64,
    pub user_name: String,
    pub query_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QueryInsight {
    pub latency_trend: Vec<LatencyPoint>,
    pub regressions: Vec<QueryRegression>,
    pub top_expensive: Vec<ExpensiveQuery>,
}

impl QueryInsight {
    pub fn latency_samples(&self) -> Vec<Sample> {
        self.latency_trend.iter().map(LatencyPoint::sample).collect()
    }
}
