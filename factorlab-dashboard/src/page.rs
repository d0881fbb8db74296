//! The single HTML page: input form plus three Plotly charts.

use chrono::{Duration, NaiveDate};
use factorlab_core::config::DashboardConfig;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>PCA on Stock Returns</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
<style>
  body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 1400px; }
  .field { margin-bottom: 0.75rem; }
  .field input[type=text], .field select { width: 50%; }
  .charts { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
  .chart { height: 420px; }
  #error { color: #b00020; min-height: 1.2em; }
</style>
</head>
<body>
<h1>PCA on Stock Returns</h1>
<form id="factor-form">
  <div class="field">
    <label for="ticker-input">Enter Ticker Symbols: </label>
    <input id="ticker-input" type="text"
           placeholder="Enter tickers separated by commas (e.g. AAPL or MSFT)">
  </div>
  <div class="field">
    <label for="component-dropdown">Select Number of Components:</label>
    <select id="component-dropdown">{{OPTIONS}}</select>
  </div>
  <div class="field">
    <label>Select Date Range:</label>
    <input id="start-date" type="date" value="{{START}}">
    <input id="end-date" type="date" value="{{END}}">
  </div>
  <button id="submit-button" type="submit">Submit</button>
</form>
<p id="error"></p>
<div class="charts">
  <div id="bar-chart" class="chart"></div>
  <div id="line-chart" class="chart"></div>
  <div id="scatter-plot" class="chart"></div>
</div>
<script>
function draw(id, fig) {
  Plotly.react(id, fig.data || [], fig.layout || {});
}
document.getElementById("factor-form").addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const error = document.getElementById("error");
  error.textContent = "";
  const body = {
    tickers: document.getElementById("ticker-input").value,
    n_components: parseInt(document.getElementById("component-dropdown").value, 10),
    start_date: document.getElementById("start-date").value,
    end_date: document.getElementById("end-date").value,
  };
  const resp = await fetch("/api/update", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  const json = await resp.json();
  if (!resp.ok) {
    error.textContent = json.error || resp.statusText;
    return;
  }
  draw("bar-chart", json.bar);
  draw("line-chart", json.line);
  draw("scatter-plot", json.scatter);
});
</script>
</body>
</html>
"#;

/// Component counts offered in the dropdown.
const COMPONENT_CHOICES: std::ops::RangeInclusive<usize> = 1..=5;

/// Render the page with today's default date range.
pub fn render(config: &DashboardConfig, today: NaiveDate) -> String {
    let options: String = COMPONENT_CHOICES
        .map(|k| {
            let selected = if k == config.default_components { " selected" } else { "" };
            format!(r#"<option value="{k}"{selected}>{k}</option>"#)
        })
        .collect();
    let start = today - Duration::days(config.lookback_days);

    TEMPLATE
        .replace("{{OPTIONS}}", &options)
        .replace("{{START}}", &start.format("%Y-%m-%d").to_string())
        .replace("{{END}}", &today.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_filled_in() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let html = render(&DashboardConfig::default(), today);

        assert!(html.contains(r#"<option value="3" selected>3</option>"#));
        assert!(html.contains(r#"<option value="5">5</option>"#));
        assert!(html.contains(r#"value="2021-07-01""#));
        assert!(html.contains(r#"value="2024-06-30""#));
        assert!(!html.contains("{{"));
    }
}
