//! Projection of an ordered sample series onto polyline coordinates.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f64 = 360.0;
pub const DEFAULT_HEIGHT: f64 = 120.0;

/// One observation in a series. `label` is usually an ISO date or timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub label: String,
    pub value: f64,
}

impl Sample {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum Projection {
    /// The input had no samples.
    Empty,
    Polyline(Vec<Point>),
}

impl Projection {
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Empty => &[],
            Self::Polyline(points) => points,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Vertices in SVG `points` attribute form: `"x,y x,y ..."`.
    pub fn points_attr(&self) -> String {
        self.points()
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Maps `samples` into a `size.width` x `size.height` box, y growing downward.
///
/// The lowest value lands on `y = height` and the highest on `y = 0`. A
/// constant series has no spread, so its range is taken as 1 and every vertex
/// sits at `y = height`. A single sample is placed at `x = 0`. Vertices keep
/// input order; nothing is sorted or deduplicated.
pub fn project(samples: &[Sample], size: ChartSize) -> Projection {
    if samples.is_empty() {
        return Projection::Empty;
    }

    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.value), hi.max(s.value))
        });
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let last = samples.len().saturating_sub(1).max(1) as f64;

    let points = samples
        .iter()
        .enumerate()
        .map(|(idx, sample)| Point {
            x: (idx as f64 / last) * size.width,
            y: size.height - ((sample.value - min) / range) * size.height,
        })
        .collect();
    Projection::Polyline(points)
}
