use serde::{Deserialize, Serialize};

/// Whether the backend has the credentials it needs to reach Snowflake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnowflakeStatus {
    pub configured: bool,
    #[serde(default)]
    pub missing: Vec<String>,
}

impl SnowflakeStatus {
    /// What the settings view assumes when the backend cannot be asked.
    pub fn unknown() -> Self {
        Self {
            configured: false,
            missing: vec!["SNOWFLAKE_ACCOUNT".to_string(), "SNOWFLAKE_USER".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
