pub mod anomaly;
pub mod governance;
pub mod overview;
pub mod query;
pub mod status;
pub mod warehouse;

pub use anomaly::Anomaly;
pub use governance::GovernanceFinding;
pub use overview::Overview;
pub use query::{ExpensiveQuery, LatencyPoint, QueryHistory, QueryInsight, QueryRegression};
pub use status::{Health, SnowflakeStatus};
pub use warehouse::{Warehouse, WarehouseMetering};
