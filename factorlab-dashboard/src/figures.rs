//! Plotly figure JSON for the three charts.

use factorlab_core::analysis::{BarData, FactorCharts, LineData, ScatterData};
use serde::Serialize;
use serde_json::{json, Value};

/// Response body of `POST /api/update`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figures {
    pub bar: Value,
    pub line: Value,
    pub scatter: Value,
}

impl Figures {
    /// Three `{}` figures, which Plotly renders as blank axes.
    pub fn empty() -> Self {
        Self {
            bar: json!({}),
            line: json!({}),
            scatter: json!({}),
        }
    }

    pub fn from_charts(charts: &FactorCharts) -> Self {
        if charts.is_empty() {
            return Self::empty();
        }
        Self {
            bar: bar_figure(&charts.explained),
            line: line_figure(&charts.cumulative),
            scatter: scatter_figure(&charts.exposures),
        }
    }
}

fn layout(title: &str, x_title: &str, y_title: &str) -> Value {
    json!({
        "title": { "text": title },
        "xaxis": { "title": { "text": x_title } },
        "yaxis": { "title": { "text": y_title } },
    })
}

pub fn bar_figure(data: &BarData) -> Value {
    json!({
        "data": [{ "type": "bar", "x": data.labels, "y": data.values }],
        "layout": layout(
            "Explained Variance by Component",
            "Principal Component",
            "Explained Variance",
        ),
    })
}

pub fn line_figure(data: &LineData) -> Value {
    json!({
        "data": [{
            "type": "scatter",
            "mode": "lines+markers",
            "x": data.labels,
            "y": data.values,
        }],
        "layout": layout(
            "Cumulative Explained Variance",
            "Principal Component",
            "Cumulative Explained Variance",
        ),
    })
}

pub fn scatter_figure(data: &ScatterData) -> Value {
    let xs: Vec<f64> = data.points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = data.points.iter().map(|p| p.y).collect();
    let text: Vec<&str> = data.points.iter().map(|p| p.symbol.as_str()).collect();
    json!({
        "data": [{
            "type": "scatter",
            "mode": "markers+text",
            "x": xs,
            "y": ys,
            "text": text,
            "textposition": "top center",
        }],
        "layout": layout("Scatter Plot of First Two Factors", "Factor 1", "Factor 2"),
    })
}
