mod chart;
mod output;
mod pages;
mod state;
mod telemetry;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use frostsight_client::ApiClient;
use frostsight_core::config::ClientConfig;
use frostsight_core::series::{ChartSize, Sample, project};
use serde::Serialize;

use crate::chart::{DEFAULT_STROKE, render_panel, render_svg};
use crate::output::{
    render_anomalies, render_cost, render_governance, render_overview, render_queries,
    render_settings, render_warehouses,
};
use crate::pages::{
    AnomaliesPage, COST_ROWS, CostPage, GovernancePage, OVERVIEW_CHART_ROWS, OverviewPage,
    QueryPage, SettingsPage, WarehousesPage, metering_samples,
};
use crate::telemetry::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "frostsight")]
#[command(about = "Warehouse cost, performance and governance dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true, help = "API origin, e.g. http://localhost:8000")]
    api_url: Option<String>,

    #[arg(long, global = true, help = "Bearer token sent with every request")]
    token: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Headline KPIs and credit burn trend")]
    Overview,
    #[command(about = "Recent warehouse metering")]
    Cost,
    #[command(about = "Query history, latency trend and regressions")]
    Queries {
        #[arg(long, help = "Only show queries whose warehouse name contains this")]
        warehouse: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    #[command(about = "Days with anomalous credit usage")]
    Anomalies {
        #[arg(long, value_parser = parse_day, help = "Explain the anomaly on this day (YYYY-MM-DD)")]
        explain: Option<NaiveDate>,
    },
    #[command(about = "Governance lint findings and suggested SQL")]
    Governance,
    #[command(about = "Connection and Snowflake configuration status")]
    Settings,
    #[command(about = "Configured warehouses")]
    Warehouses {
        #[arg(long)]
        limit: Option<usize>,
    },
    #[command(about = "Check that the API is reachable")]
    Health,
    #[command(about = "Render a series as a sparkline or SVG line chart")]
    Chart {
        #[arg(value_enum)]
        series: ChartSeries,
        #[arg(long, help = "Write the chart as SVG to this path")]
        svg: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_STROKE)]
        stroke: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ChartSeries {
    /// Credit burn over the last 14 metering rows
    Credits,
    /// Credit timeline over the last 20 metering rows
    Cost,
    /// Daily p95 query latency
    Latency,
}

impl ChartSeries {
    fn title(self) -> &'static str {
        match self {
            Self::Credits => "Credit Burn Trend",
            Self::Cost => "Warehouse Credit Timeline",
            Self::Latency => "Regression View (p95 latency)",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing(cli.verbose);

    let config = ClientConfig::load()
        .context("load config")?
        .with_api_url(cli.api_url)
        .context("--api-url")?
        .with_token(cli.token);
    let client = ApiClient::new(config).context("build api client")?;
    let color = std::io::stdout().is_terminal();

    match cli.command {
        Commands::Overview => {
            let page = OverviewPage::load(&client).await;
            emit(&page, cli.json, render_overview)
        }
        Commands::Cost => {
            let page = CostPage::load(&client).await;
            emit(&page, cli.json, render_cost)
        }
        Commands::Queries { warehouse, limit } => {
            let page = QueryPage::load(&client, limit, warehouse).await;
            emit(&page, cli.json, render_queries)
        }
        Commands::Anomalies { explain } => {
            let page = AnomaliesPage::load(&client, explain).await;
            emit(&page, cli.json, render_anomalies)
        }
        Commands::Governance => {
            let page = GovernancePage::load(&client).await;
            emit(&page, cli.json, |p| render_governance(p, color))
        }
        Commands::Settings => {
            let page = SettingsPage::load(&client).await;
            emit(&page, cli.json, |p| render_settings(p, color))
        }
        Commands::Warehouses { limit } => {
            let page = WarehousesPage::load(&client, limit).await;
            emit(&page, cli.json, render_warehouses)
        }
        Commands::Health => run_health(&client, cli.json).await,
        Commands::Chart {
            series,
            svg,
            stroke,
        } => run_chart(&client, series, svg, &stroke, cli.json).await,
    }
}

fn emit<P: Serialize>(page: &P, json: bool, render: impl Fn(&P) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        print!("{}", render(page));
    }
    Ok(())
}

async fn run_health(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let health = client
        .health()
        .await
        .with_context(|| format!("reach {}", client.config().api_url))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        println!(
            "status={} api_url={}",
            health.status,
            client.config().api_url
        );
    }
    if !health.is_ok() {
        anyhow::bail!("api reported status {}", health.status);
    }
    Ok(())
}

async fn run_chart(
    client: &ApiClient,
    series: ChartSeries,
    svg: Option<PathBuf>,
    stroke: &str,
    json: bool,
) -> anyhow::Result<()> {
    let samples = load_series(client, series).await;
    let size = ChartSize::default();
    let projection = project(&samples, size);

    if let Some(path) = &svg {
        std::fs::write(path, render_svg(&projection, size, stroke))
            .with_context(|| format!("write chart to {}", path.display()))?;
        tracing::info!(path = %path.display(), points = samples.len(), "wrote chart");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
    } else if svg.is_none() {
        print!("{}", render_panel(series.title(), &samples));
    }
    Ok(())
}

/// Fetch failures chart as an empty series, same as the pages.
async fn load_series(client: &ApiClient, series: ChartSeries) -> Vec<Sample> {
    match series {
        ChartSeries::Credits | ChartSeries::Cost => {
            let rows = if series == ChartSeries::Credits {
                OVERVIEW_CHART_ROWS
            } else {
                COST_ROWS
            };
            client
                .metering()
                .await
                .map(|metering| metering_samples(&metering, rows))
                .unwrap_or_default()
        }
        ChartSeries::Latency => client
            .query_insights()
            .await
            .map(|insights| insights.latency_samples())
            .unwrap_or_default(),
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
