use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::domain::{Applicant, CountryTable, Disposition};
use super::evaluation::{DecisionEngine, EntryDecision};
use super::loader::deserialize_optional_date;

/// Shared, read-only state behind the decision endpoint.
#[derive(Debug, Clone, Default)]
pub struct EntryDecisionState {
    pub engine: DecisionEngine,
    pub countries: Option<Arc<CountryTable>>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub applicants: Vec<Applicant>,
    #[serde(default)]
    pub countries: Option<CountryTable>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub today: NaiveDate,
    pub dispositions: Vec<Disposition>,
    pub decisions: Vec<DecisionView>,
}

#[derive(Debug, Serialize)]
pub struct DecisionView {
    pub summary: String,
    #[serde(flatten)]
    pub decision: EntryDecision,
}

/// Router builder exposing the batch decision endpoint.
pub fn entry_router(state: Arc<EntryDecisionState>) -> Router {
    Router::new()
        .route("/api/v1/entry/decisions", post(decide_handler))
        .with_state(state)
}

/// Decides a batch. Every failure, including a body axum cannot parse, is
/// answered with a JSON `{"error": ...}` payload via [`AppError`].
pub(crate) async fn decide_handler(
    State(state): State<Arc<EntryDecisionState>>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<DecisionResponse>, AppError> {
    let Json(DecisionRequest {
        applicants,
        countries,
        today,
    }) = payload?;

    let countries = countries
        .map(Arc::new)
        .or_else(|| state.countries.clone())
        .ok_or(AppError::MissingCountryTable)?;

    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let decisions = state.engine.evaluate_batch(&applicants, &countries, today)?;
    let dispositions = decisions.iter().map(|decision| decision.disposition).collect();
    let decisions = decisions
        .into_iter()
        .map(|decision| DecisionView {
            summary: decision.summary(),
            decision,
        })
        .collect();

    Ok(Json(DecisionResponse {
        today,
        dispositions,
        decisions,
    }))
}
