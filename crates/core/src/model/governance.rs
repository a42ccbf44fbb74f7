use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GovernanceFinding {
    pub finding_type: String,
    pub severity: String,
    pub description: String,
    pub recommendation_sql: String,
}
