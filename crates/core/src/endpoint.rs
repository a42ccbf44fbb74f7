use std::fmt;

pub const DEFAULT_WAREHOUSE_LIMIT: usize = 100;
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// Read-only resources exposed by the metrics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    Overview,
    Warehouses { limit: usize },
    Metering,
    Queries { limit: usize },
    QueryInsights,
    Anomalies,
    GovernanceFindings,
    SnowflakeStatus,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Overview => "overview",
            Self::Warehouses { .. } => "warehouses",
            Self::Metering => "metering",
            Self::Queries { .. } => "queries",
            Self::QueryInsights => "query_insights",
            Self::Anomalies => "anomalies",
            Self::GovernanceFindings => "governance",
            Self::SnowflakeStatus => "snowflake_status",
        }
    }

    /// Path relative to the API origin, always starting with `/`.
    pub fn path(&self) -> String {
        match self {
            Self::Health => "/api/v1/health".to_string(),
            Self::Overview => "/api/v1/overview".to_string(),
            Self::Warehouses { limit } => format!("/api/v1/warehouses?limit={limit}"),
            Self::Metering => "/api/v1/warehouse-metering".to_string(),
            Self::Queries { limit } => format!("/api/v1/queries?limit={limit}"),
            Self::QueryInsights => "/api/v1/queries/insights".to_string(),
            Self::Anomalies => "/api/v1/anomalies".to_string(),
            Self::GovernanceFindings => "/api/v1/governance/findings".to_string(),
            Self::SnowflakeStatus => "/api/v1/snowflake/status".to_string(),
        }
    }

    /// Health is the only endpoint served without a bearer token.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Health)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
