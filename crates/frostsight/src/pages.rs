//! Dashboard pages: each one fetches what it shows and folds the outcome into
//! [`FetchState`]s. Loading a page never fails; renderers fall back to empty
//! tables and placeholders.

use chrono::NaiveDate;
use frostsight_client::ApiClient;
use frostsight_core::model::{
    Anomaly, GovernanceFinding, Overview, QueryHistory, QueryInsight, SnowflakeStatus, Warehouse,
    WarehouseMetering,
};
use frostsight_core::series::Sample;
use serde::Serialize;

use crate::state::FetchState;

pub const OVERVIEW_CHART_ROWS: usize = 14;
pub const COST_ROWS: usize = 20;
pub const ANOMALY_CANDIDATES: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct OverviewData {
    pub overview: Overview,
    pub metering: Vec<WarehouseMetering>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverviewPage {
    pub state: FetchState<OverviewData>,
}

impl OverviewPage {
    /// Overview and metering are requested together; either failing fails the page.
    pub async fn load(client: &ApiClient) -> Self {
        let result = futures::future::try_join(client.overview(), client.metering())
            .await
            .map(|(overview, metering)| OverviewData { overview, metering });
        Self {
            state: FetchState::from_result(result),
        }
    }

    pub fn overview(&self) -> Option<&Overview> {
        self.state.data().map(|d| &d.overview)
    }

    pub fn credit_samples(&self) -> Vec<Sample> {
        self.state
            .data()
            .map(|d| metering_samples(&d.metering, OVERVIEW_CHART_ROWS))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CostPage {
    pub metering: FetchState<Vec<WarehouseMetering>>,
}

impl CostPage {
    pub async fn load(client: &ApiClient) -> Self {
        Self {
            metering: FetchState::from_result(client.metering().await),
        }
    }

    pub fn recent(&self) -> &[WarehouseMetering] {
        tail(self.metering.rows(), COST_ROWS)
    }

    pub fn credit_samples(&self) -> Vec<Sample> {
        metering_samples(self.metering.rows(), COST_ROWS)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryPage {
    pub queries: FetchState<Vec<QueryHistory>>,
    pub insights: FetchState<QueryInsight>,
    pub warehouse_filter: Option<String>,
}

impl QueryPage {
    /// History and insights are independent; one failing leaves the other intact.
    pub async fn load(client: &ApiClient, limit: Option<usize>, filter: Option<String>) -> Self {
        let (queries, insights) =
            futures::future::join(client.queries(limit), client.query_insights()).await;
        Self {
            queries: FetchState::from_result(queries),
            insights: FetchState::from_result(insights),
            warehouse_filter: filter.filter(|f| !f.is_empty()),
        }
    }

    /// Queries whose warehouse name contains the filter (case-sensitive).
    pub fn filtered(&self) -> Vec<&QueryHistory> {
        let rows = self.queries.rows().iter();
        match self.warehouse_filter.as_deref() {
            Some(needle) => rows.filter(|q| q.warehouse_name.contains(needle)).collect(),
            None => rows.collect(),
        }
    }

    pub fn latency_samples(&self) -> Vec<Sample> {
        self.insights
            .data()
            .map(QueryInsight::latency_samples)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnomaliesPage {
    pub anomalies: FetchState<Vec<Anomaly>>,
    pub selected_day: Option<NaiveDate>,
}

impl AnomaliesPage {
    pub async fn load(client: &ApiClient, selected_day: Option<NaiveDate>) -> Self {
        Self {
            anomalies: FetchState::from_result(client.anomalies().await),
            selected_day,
        }
    }

    pub fn selected(&self) -> Option<&Anomaly> {
        let day = self.selected_day?;
        self.anomalies.rows().iter().find(|a| a.day == day)
    }

    pub fn candidates(&self) -> &[Anomaly] {
        let rows = self.anomalies.rows();
        &rows[..rows.len().min(ANOMALY_CANDIDATES)]
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GovernancePage {
    pub findings: FetchState<Vec<GovernanceFinding>>,
}

impl GovernancePage {
    pub async fn load(client: &ApiClient) -> Self {
        Self {
            findings: FetchState::from_result(client.governance().await),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsPage {
    pub api_url: String,
    pub status: FetchState<SnowflakeStatus>,
}

impl SettingsPage {
    pub async fn load(client: &ApiClient) -> Self {
        Self {
            api_url: client.config().api_url.clone(),
            status: FetchState::from_result(client.snowflake_status().await),
        }
    }

    /// Backend answer, or the assumption that nothing is configured.
    pub fn snowflake(&self) -> SnowflakeStatus {
        self.status
            .data()
            .cloned()
            .unwrap_or_else(SnowflakeStatus::unknown)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WarehousesPage {
    pub warehouses: FetchState<Vec<Warehouse>>,
}

impl WarehousesPage {
    pub async fn load(client: &ApiClient, limit: Option<usize>) -> Self {
        Self {
            warehouses: FetchState::from_result(client.warehouses(limit).await),
        }
    }
}

/// Credit samples for the last `n` metering rows, oldest first.
pub fn metering_samples(rows: &[WarehouseMetering], n: usize) -> Vec<Sample> {
    tail(rows, n)
        .iter()
        .map(WarehouseMetering::credit_sample)
        .collect()
}

fn tail<T>(rows: &[T], n: usize) -> &[T] {
    &rows[rows.len().saturating_sub(n)..]
}
