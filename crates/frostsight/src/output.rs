use frostsight_core::model::{
    Anomaly, ExpensiveQuery, GovernanceFinding, QueryHistory, QueryRegression, Warehouse,
    WarehouseMetering,
};
use owo_colors::OwoColorize;

use crate::chart::render_panel;
use crate::pages::{
    AnomaliesPage, CostPage, GovernancePage, OverviewPage, QueryPage, SettingsPage,
    WarehousesPage,
};

const PLACEHOLDER: &str = "--";

pub struct Column<T> {
    header: &'static str,
    cell: fn(&T) -> String,
    paint: Option<fn(&T, &str) -> String>,
}

impl<T> Column<T> {
    pub fn new(header: &'static str, cell: fn(&T) -> String) -> Self {
        Self {
            header,
            cell,
            paint: None,
        }
    }

    /// Styles an already padded cell; only applied when color is on.
    pub fn painted(mut self, paint: fn(&T, &str) -> String) -> Self {
        self.paint = Some(paint);
        self
    }
}

pub fn render_table<'r, T: 'r>(
    columns: &[Column<T>],
    rows: impl IntoIterator<Item = &'r T>,
    color: bool,
) -> String {
    let rows: Vec<&T> = rows.into_iter().collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| (c.cell)(row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(c.header, *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(header.trim_end());
    out.push('\n');
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&rule);
    out.push('\n');

    for (row, row_cells) in rows.iter().zip(&cells) {
        let line = columns
            .iter()
            .zip(row_cells)
            .zip(&widths)
            .map(|((c, text), w)| {
                let padded = pad(text, *w);
                match c.paint {
                    Some(paint) if color => paint(row, &padded),
                    _ => padded,
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

pub fn kpi_card(title: &str, value: &str, trend: Option<&str>) -> String {
    match trend {
        Some(trend) => format!("{title:<18} {value:>10}  {trend}"),
        None => format!("{title:<18} {value:>10}"),
    }
}

pub fn render_overview(page: &OverviewPage) -> String {
    let mut out = String::from("Overview\n");
    if let Some(err) = page.state.error() {
        out.push_str(&format!("error: {err}\n"));
    }
    let overview = page.overview();
    let cards = [
        (
            "Credits / Day",
            overview.map(|o| format!("{:.1}", o.credits_today)),
            "Last 24h burn",
        ),
        (
            "p95 Latency",
            overview.map(|o| format!("{:.0} ms", o.p95_latency_today_ms)),
            "Rolling p95",
        ),
        (
            "Anomalies",
            overview.map(|o| o.anomaly_count.to_string()),
            "MAD-based detection",
        ),
        (
            "Governance Issues",
            overview.map(|o| o.governance_issue_count.to_string()),
            "Lint findings",
        ),
    ];
    for (title, value, trend) in cards {
        let value = value.unwrap_or_else(|| PLACEHOLDER.to_string());
        out.push_str(&kpi_card(title, &value, Some(trend)));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render_panel("Credit Burn Trend", &page.credit_samples()));
    out
}

pub fn render_cost(page: &CostPage) -> String {
    let mut out = String::from("Cost Explorer\n");
    out.push_str(&render_panel(
        "Warehouse Credit Timeline",
        &page.credit_samples(),
    ));
    out.push_str("\nTop Warehouses\n");
    let columns = [
        Column::new("Warehouse", |r: &WarehouseMetering| r.warehouse_name.clone()),
        Column::new("Credits", |r: &WarehouseMetering| {
            format!("{:.2}", r.credits_used)
        }),
        Column::new("Start", |r: &WarehouseMetering| {
            r.start_day()
                .map(|day| day.to_string())
                .unwrap_or_else(|| r.start_time.clone())
        }),
    ];
    out.push_str(&render_table(&columns, page.recent(), false));
    out
}

pub fn render_queries(page: &QueryPage) -> String {
    let mut out = String::from("Query Explorer\n");
    out.push_str(&render_panel(
        "Regression View (p95 latency)",
        &page.latency_samples(),
    ));

    out.push('\n');
    match &page.warehouse_filter {
        Some(filter) => out.push_str(&format!("Queries (warehouse contains \"{filter}\")\n")),
        None => out.push_str("Queries\n"),
    }
    let columns = [
        Column::new("Query", |r: &QueryHistory| r.query_id.clone()),
        Column::new("Warehouse", |r: &QueryHistory| r.warehouse_name.clone()),
        Column::new("User", |r: &QueryHistory| r.user_name.clone()),
        Column::new("Elapsed (ms)", |r: &QueryHistory| {
            r.total_elapsed_ms.to_string()
        }),
    ];
    out.push_str(&render_table(&columns, page.filtered(), false));

    let insights = page.insights.data();
    let regressions = insights
        .map(|i| i.regressions.as_slice())
        .unwrap_or_default();
    let expensive = insights
        .map(|i| i.top_expensive.as_slice())
        .unwrap_or_default();

    out.push_str("\nRegressions\n");
    let columns = [
        Column::new("Warehouse", |r: &QueryRegression| r.warehouse_name.clone()),
        Column::new("p95 prev (ms)", |r: &QueryRegression| {
            format!("{:.0}", r.p95_prev_ms)
        }),
        Column::new("p95 recent (ms)", |r: &QueryRegression| {
            format!("{:.0}", r.p95_recent_ms)
        }),
        Column::new("Delta (ms)", |r: &QueryRegression| {
            format!("{:+.0}", r.delta_ms)
        }),
    ];
    out.push_str(&render_table(&columns, regressions, false));

    out.push_str("\nTop Expensive Queries\n");
    let columns = [
        Column::new("Query", |r: &ExpensiveQuery| r.query_id.clone()),
        Column::new("Warehouse", |r: &ExpensiveQuery| r.warehouse_name.clone()),
        Column::new("Elapsed (ms)", |r: &ExpensiveQuery| {
            r.total_elapsed_ms.to_string()
        }),
    ];
    out.push_str(&render_table(&columns, expensive, false));
    out
}

pub fn render_anomalies(page: &AnomaliesPage) -> String {
    let mut out = String::from("Anomalies\n");
    let columns = [
        Column::new("Day", |r: &Anomaly| r.day.to_string()),
        Column::new("Credits", |r: &Anomaly| format!("{:.2}", r.credits_used)),
        Column::new("Z-Score", |r: &Anomaly| format!("{:.2}", r.z_score)),
    ];
    out.push_str(&render_table(&columns, page.anomalies.rows(), false));

    out.push_str("\nExplain\n");
    match (page.selected(), page.selected_day) {
        (Some(anomaly), _) => {
            out.push_str(&format!("  Spike on {}\n", anomaly.day));
            out.push_str(&format!("  Credits used: {:.2}\n", anomaly.credits_used));
            out.push_str(&format!("  Deviation score: {:.2}\n", anomaly.z_score));
        }
        (None, Some(day)) => out.push_str(&format!("  No anomaly recorded on {day}.\n")),
        (None, None) => out.push_str("  Select a row to see why it was flagged.\n"),
    }
    for candidate in page.candidates() {
        out.push_str(&format!(
            "  Explain {0}: frostsight anomalies --explain {0}\n",
            candidate.day
        ));
    }
    out
}

pub fn render_governance(page: &GovernancePage, color: bool) -> String {
    let mut out = String::from("Governance\nLint Rules\n");
    let columns = [
        Column::new("Type", |r: &GovernanceFinding| r.finding_type.clone()),
        Column::new("Severity", |r: &GovernanceFinding| r.severity.clone())
            .painted(|r, text| paint_severity(&r.severity, text)),
        Column::new("Description", |r: &GovernanceFinding| r.description.clone()),
    ];
    out.push_str(&render_table(&columns, page.findings.rows(), color));

    out.push_str("\nRecommended SQL\n");
    for finding in page.findings.rows() {
        out.push_str(&format!("  {}\n", finding.recommendation_sql));
    }
    out
}

pub fn render_settings(page: &SettingsPage, color: bool) -> String {
    let status = page.snowflake();
    let mut out = String::from("Settings\nMode\n");
    out.push_str(&format!("  {:<16} DEFAULT\n", "Demo Mode"));
    let label = if status.configured {
        "CONFIGURED"
    } else {
        "NOT CONFIGURED"
    };
    let label = match (color, status.configured) {
        (false, _) => label.to_string(),
        (true, true) => label.green().to_string(),
        (true, false) => label.yellow().to_string(),
    };
    out.push_str(&format!("  {:<16} {label}\n", "Snowflake Mode"));
    if !status.missing.is_empty() {
        out.push_str(&format!(
            "  Missing env vars: {}\n",
            status.missing.join(", ")
        ));
    }
    out.push_str(&format!("\nConnection\n  API base URL: {}\n", page.api_url));
    out
}

pub fn render_warehouses(page: &WarehousesPage) -> String {
    let mut out = String::from("Warehouses\n");
    if let Some(err) = page.warehouses.error() {
        out.push_str(&format!("error: {err}\n"));
    }
    let columns = [
        Column::new("Name", |r: &Warehouse| r.name.clone()),
        Column::new("Size", |r: &Warehouse| r.size.clone()),
        Column::new("Credits/hr", |r: &Warehouse| {
            format!("{:.2}", r.credit_per_hour)
        }),
    ];
    out.push_str(&render_table(&columns, page.warehouses.rows(), false));
    out
}

fn paint_severity(severity: &str, text: &str) -> String {
    match severity.to_ascii_lowercase().as_str() {
        "critical" | "high" => text.red().to_string(),
        "medium" => text.yellow().to_string(),
        "low" => text.green().to_string(),
        _ => text.to_string(),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}
