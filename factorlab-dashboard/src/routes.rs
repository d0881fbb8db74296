use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::DashboardError;
use crate::figures::Figures;
use crate::form::UpdateForm;
use crate::page;
use crate::state::AppState;

/// Assemble the router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/update", post(update))
        .route("/health", get(health))
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let today = chrono::Local::now().date_naive();
    Html(page::render(&state.config, today))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run the analyzer for one form submission.
async fn update(
    State(state): State<Arc<AppState>>,
    Json(form): Json<UpdateForm>,
) -> Result<Json<Figures>, DashboardError> {
    let today = chrono::Local::now().date_naive();
    let Some(request) = form.into_request(&state.config, today)? else {
        return Ok(Json(Figures::empty()));
    };

    tracing::info!(
        tickers = ?request.tickers,
        n_components = request.n_components,
        start = %request.start_date,
        end = %request.end_date,
        "update requested"
    );

    let provider = Arc::clone(&state.provider);
    let charts = tokio::task::spawn_blocking(move || {
        factorlab_core::analysis::update(provider.as_ref(), &request)
    })
    .await??;

    Ok(Json(Figures::from_charts(&charts)))
}
