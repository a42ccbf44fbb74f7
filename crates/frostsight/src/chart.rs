use frostsight_core::series::{ChartSize, Projection, Sample, project};

pub const DEFAULT_STROKE: &str = "#38bdf8";
const EMPTY_LABEL: &str = "No data";
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Standalone SVG for a projected series; the empty state becomes a placeholder div.
pub fn render_svg(projection: &Projection, size: ChartSize, stroke: &str) -> String {
    if projection.is_empty() {
        return format!("<div class=\"chart-empty\">{EMPTY_LABEL}</div>");
    }
    format!(
        "<svg class=\"line-chart\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\">\
         <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"3\"/></svg>",
        size.width,
        size.height,
        projection.points_attr(),
        escape_attr(stroke)
    )
}

/// One block glyph per vertex. `y = height` (the bottom edge) maps to the lowest bar.
pub fn render_sparkline(projection: &Projection, size: ChartSize) -> String {
    if projection.is_empty() {
        return EMPTY_LABEL.to_string();
    }
    let top = (BARS.len() - 1) as f64;
    projection
        .points()
        .iter()
        .map(|p| {
            let level = if size.height > 0.0 {
                ((size.height - p.y) / size.height * top).round()
            } else {
                0.0
            };
            BARS[level.clamp(0.0, top) as usize]
        })
        .collect()
}

/// Titled terminal panel: sparkline plus the first/last labels and value range.
pub fn render_panel(title: &str, samples: &[Sample]) -> String {
    let size = ChartSize::default();
    let projection = project(samples, size);
    let mut out = format!("{title}\n  {}\n", render_sparkline(&projection, size));
    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        let (min, max) = samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.value), hi.max(s.value))
        });
        out.push_str(&format!(
            "  {} .. {}  min={min:.2} max={max:.2} points={}\n",
            first.label,
            last.label,
            samples.len()
        ));
    }
    out
}

fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
