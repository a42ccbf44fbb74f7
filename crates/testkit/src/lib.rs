use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use frostsight_core::config::DEFAULT_TOKEN;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: String,
}

#[derive(Clone)]
struct MockState {
    routes: Arc<HashMap<String, CannedResponse>>,
    token: Option<String>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[derive(Default)]
pub struct MockApiBuilder {
    routes: HashMap<String, CannedResponse>,
    token: Option<String>,
}

impl MockApiBuilder {
    pub fn json(mut self, path: &str, body: Value) -> Self {
        self.routes.insert(
            path.to_string(),
            CannedResponse {
                status: StatusCode::OK,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn respond(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            CannedResponse {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body: body.to_string(),
            },
        );
        self
    }

    /// Reject requests that do not carry `Bearer <token>`, like the real backend.
    pub fn require_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Every endpoint answered with the demo fixtures below.
    pub fn demo(self) -> Self {
        self.json("/api/v1/health", json!({"status": "ok"}))
            .json("/api/v1/overview", overview_json())
            .json("/api/v1/warehouses", warehouses_json())
            .json("/api/v1/warehouse-metering", metering_json(30))
            .json("/api/v1/queries", queries_json())
            .json("/api/v1/queries/insights", insights_json())
            .json("/api/v1/anomalies", anomalies_json())
            .json("/api/v1/governance/findings", governance_json())
            .json(
                "/api/v1/snowflake/status",
                json!({"configured": false, "missing": ["SNOWFLAKE_ACCOUNT"]}),
            )
            .require_token(DEFAULT_TOKEN)
    }

    pub async fn start(self) -> anyhow::Result<MockApi> {
        let state = MockState {
            routes: Arc::new(self.routes),
            token: self.token,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let seen = state.seen.clone();
        let app = Router::new()
            .fallback(serve_canned)
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::warn!(error = ?err, "mock api server stopped");
            }
        });

        Ok(MockApi { addr, seen, task })
    }
}

/// In-process stand-in for the metrics API, bound to an ephemeral port.
pub struct MockApi {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    task: JoinHandle<()>,
}

impl MockApi {
    pub fn builder() -> MockApiBuilder {
        MockApiBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_canned(State(state): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Ok(mut seen) = state.seen.lock() {
        seen.push(SeenRequest {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: authorization.clone(),
        });
    }

    if let Some(token) = &state.token
        && uri.path() != "/api/v1/health"
        && authorization.as_deref() != Some(format!("Bearer {token}").as_str())
    {
        return json_response(StatusCode::UNAUTHORIZED, json!({"detail": "unauthorized"}).to_string());
    }

    match state.routes.get(uri.path()) {
        Some(canned) => json_response(canned.status, canned.body.clone()),
        None => json_response(StatusCode::NOT_FOUND, json!({"detail": "not found"}).to_string()),
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

pub fn overview_json() -> Value {
    json!({
        "credits_today": 12.4,
        "p95_latency_today_ms": 880.0,
        "anomaly_count": 2,
        "governance_issue_count": 1
    })
}

pub fn warehouses_json() -> Value {
    json!([
        {"id": 1, "name": "WH_CORE", "size": "MEDIUM", "credit_per_hour": 4.0},
        {"id": 2, "name": "WH_ETL", "size": "LARGE", "credit_per_hour": 8.0}
    ])
}

/// `days` daily metering rows alternating between two warehouses, credits 1.0, 2.0, ...
pub fn metering_json(days: usize) -> Value {
    let base = base_time();
    let rows = (0..days)
        .map(|i| {
            let start = base + Duration::days(i as i64);
            json!({
                "id": i + 1,
                "warehouse_name": if i % 2 == 0 { "WH_CORE" } else { "WH_ETL" },
                "start_time": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "end_time": (start + Duration::hours(2)).format("%Y-%m-%dT%H:%M:%S").to_string(),
                "credits_used": (i + 1) as f64
            })
        })
        .collect::<Vec<_>>();
    Value::Array(rows)
}

pub fn queries_json() -> Value {
    json!([
        {
            "id": 1, "query_id": "q-001", "warehouse_name": "WH_CORE",
            "user_name": "ana", "role_name": "ANALYST",
            "start_time": "2024-01-01T09:00:00", "end_time": "2024-01-01T09:00:01",
            "total_elapsed_ms": 1200, "bytes_scanned": 1048576, "rows_produced": 10,
            "query_text": "select 1"
        },
        {
            "id": 2, "query_id": "q-002", "warehouse_name": "WH_ETL",
            "user_name": "etl_bot", "role_name": "DATA_ENGINEER",
            "start_time": "2024-01-01T10:00:00", "end_time": "2024-01-01T10:00:09",
            "total_elapsed_ms": 9100, "bytes_scanned": 734003200, "rows_produced": 52000,
            "query_text": "insert into fact_sales select * from stage_sales"
        }
    ])
}

pub fn insights_json() -> Value {
    json!({
        "latency_trend": [
            {"day": "2024-01-01", "p95_ms": 800.0},
            {"day": "2024-01-02", "p95_ms": 950.0},
            {"day": "2024-01-03", "p95_ms": 880.0}
        ],
        "regressions": [
            {"warehouse_name": "WH_ETL", "p95_prev_ms": 4000.0, "p95_recent_ms": 9100.0, "delta_ms": 5100.0}
        ],
        "top_expensive": [
            {
                "query_id": "q-002", "warehouse_name": "WH_ETL", "total_elapsed_ms": 9100,
                "bytes_scanned": 734003200, "user_name": "etl_bot",
                "query_text": "insert into fact_sales select * from stage_sales"
            }
        ]
    })
}

pub fn anomalies_json() -> Value {
    json!([
        {"day": "2024-01-05", "credits_used": 41.25, "z_score": 4.5},
        {"day": "2024-01-12", "credits_used": 38.0, "z_score": 3.75}
    ])
}

pub fn governance_json() -> Value {
    json!([
        {
            "finding_type": "unused_role",
            "severity": "medium",
            "description": "Role REPORTING has not been used in 30 days",
            "recommendation_sql": "DROP ROLE REPORTING;"
        },
        {
            "finding_type": "auto_suspend",
            "severity": "high",
            "description": "Warehouse WH_ETL auto-suspend is disabled",
            "recommendation_sql": "ALTER WAREHOUSE WH_ETL SET AUTO_SUSPEND = 60;"
        }
    ])
}
