use std::net::TcpListener;

use frostsight_client::ApiClient;
use frostsight_core::FrostsightError;
use frostsight_core::config::ClientConfig;
use frostsight_core::model::Overview;
use serde_json::json;
use testkit::MockApi;

fn client_for(mock: &MockApi) -> ApiClient {
    ApiClient::new(ClientConfig::new(mock.base_url(), "local-dev-token")).unwrap()
}

#[tokio::test]
async fn overview_decodes_body_and_sends_bearer_token() -> anyhow::Result<()> {
    let mock = MockApi::builder()
        .json(
            "/api/v1/overview",
            json!({
                "credits_today": 12.4,
                "p95_latency_today_ms": 880.0,
                "anomaly_count": 2,
                "governance_issue_count": 1
            }),
        )
        .start()
        .await?;

    let overview = client_for(&mock).overview().await?;
    assert_eq!(
        overview,
        Overview {
            credits_today: 12.4,
            p95_latency_today_ms: 880.0,
            anomaly_count: 2,
            governance_issue_count: 1,
        }
    );

    let seen = mock.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/api/v1/overview");
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some("Bearer local-dev-token")
    );
    Ok(())
}

#[tokio::test]
async fn server_error_surfaces_body_text() -> anyhow::Result<()> {
    let mock = MockApi::builder()
        .respond("/api/v1/anomalies", 500, "anomaly scorer unavailable")
        .start()
        .await?;

    let err = client_for(&mock).anomalies().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "anomaly scorer unavailable");
    Ok(())
}

#[tokio::test]
async fn server_error_without_body_uses_generic_message() -> anyhow::Result<()> {
    let mock = MockApi::builder()
        .respond("/api/v1/overview", 500, "")
        .start()
        .await?;

    let err = client_for(&mock).overview().await.unwrap_err();
    assert!(matches!(err, FrostsightError::Request { status: 500, .. }));
    assert_eq!(err.to_string(), "Request failed");
    Ok(())
}

#[tokio::test]
async fn wrong_token_is_rejected_by_backend() -> anyhow::Result<()> {
    let mock = MockApi::builder().demo().start().await?;
    let client = ApiClient::new(ClientConfig::new(mock.base_url(), "stale-token"))?;

    let err = client.governance().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("unauthorized"));

    // health is open, so the same client still reaches it
    assert!(client.health().await?.is_ok());
    Ok(())
}

#[tokio::test]
async fn list_endpoints_carry_limits() -> anyhow::Result<()> {
    let mock = MockApi::builder().demo().start().await?;
    let client = client_for(&mock);

    let warehouses = client.warehouses(None).await?;
    assert_eq!(warehouses.len(), 2);
    let queries = client.queries(Some(5)).await?;
    assert_eq!(queries[1].warehouse_name, "WH_ETL");

    let seen = mock.requests();
    assert_eq!(seen[0].path, "/api/v1/warehouses");
    assert_eq!(seen[0].query.as_deref(), Some("limit=100"));
    assert_eq!(seen[1].path, "/api/v1/queries");
    assert_eq!(seen[1].query.as_deref(), Some("limit=5"));
    Ok(())
}

#[tokio::test]
async fn every_dashboard_shape_decodes() -> anyhow::Result<()> {
    let mock = MockApi::builder().demo().start().await?;
    let client = client_for(&mock);

    assert_eq!(client.metering().await?.len(), 30);
    let insights = client.query_insights().await?;
    assert_eq!(insights.latency_trend.len(), 3);
    assert_eq!(insights.regressions[0].delta_ms, 5100.0);
    assert_eq!(insights.top_expensive[0].query_id, "q-002");
    let anomalies = client.anomalies().await?;
    assert_eq!(anomalies[0].day.to_string(), "2024-01-05");
    assert_eq!(client.governance().await?.len(), 2);
    let status = client.snowflake_status().await?;
    assert!(!status.configured);
    assert_eq!(status.missing, vec!["SNOWFLAKE_ACCOUNT".to_string()]);
    Ok(())
}

#[tokio::test]
async fn export_style_timestamps_decode_verbatim() -> anyhow::Result<()> {
    let mock = MockApi::builder()
        .json(
            "/api/v1/warehouse-metering",
            json!([{
                "id": 1, "warehouse_name": "WH_CORE",
                "start_time": "2024-01-02T00:00:00+00:00",
                "end_time": "2024-01-02T01:00:00+00:00",
                "credits_used": 3.5
            }]),
        )
        .json(
            "/api/v1/queries",
            json!([{
                "id": 1, "query_id": "q-001", "warehouse_name": "WH_CORE",
                "user_name": "ana", "role_name": "ANALYST",
                "start_time": "2024-01-01 09:00:00", "end_time": "2024-01-01 09:00:01",
                "total_elapsed_ms": 1200, "bytes_scanned": 0, "rows_produced": 1,
                "query_text": "select 1"
            }]),
        )
        .start()
        .await?;
    let client = client_for(&mock);

    let metering = client.metering().await?;
    assert_eq!(metering[0].start_time, "2024-01-02T00:00:00+00:00");
    let queries = client.queries(None).await?;
    assert_eq!(queries[0].start_time, "2024-01-01 09:00:00");
    Ok(())
}

#[tokio::test]
async fn whitespace_error_body_is_kept() -> anyhow::Result<()> {
    let mock = MockApi::builder()
        .respond("/api/v1/overview", 500, "   ")
        .start()
        .await?;

    let err = client_for(&mock).overview().await.unwrap_err();
    assert_eq!(err.to_string(), "   ");
    Ok(())
}

#[tokio::test]
async fn identical_calls_are_not_deduplicated() -> anyhow::Result<()> {
    let mock = MockApi::builder().demo().start().await?;
    let client = client_for(&mock);

    let (a, b) = tokio::join!(client.anomalies(), client.anomalies());
    assert_eq!(a?, b?);
    assert_eq!(mock.requests().len(), 2);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() -> anyhow::Result<()> {
    let mock = MockApi::builder()
        .respond("/api/v1/overview", 200, "{\"credits_today\": \"lots\"}")
        .start()
        .await?;

    let err = client_for(&mock).overview().await.unwrap_err();
    assert!(matches!(err, FrostsightError::Decode(_)));
    Ok(())
}

#[tokio::test]
async fn relative_path_is_rejected_before_sending() -> anyhow::Result<()> {
    let mock = MockApi::builder().demo().start().await?;

    let err = client_for(&mock)
        .request::<Overview>("api/v1/overview")
        .await
        .unwrap_err();
    assert!(matches!(err, FrostsightError::InvalidArgument(_)));
    assert!(mock.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let client = ApiClient::new(ClientConfig::new(
        format!("http://127.0.0.1:{port}"),
        "local-dev-token",
    ))?;

    let err = client.overview().await.unwrap_err();
    assert!(matches!(err, FrostsightError::Network(_)));
    assert!(!err.to_string().is_empty());
    Ok(())
}
