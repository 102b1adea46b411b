use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    scoring, AppState, ClearResponse, HistoryResponse, ScoreRequest, ScoreResponse,
    SubmissionRecord, SummaryResponse,
};

const REQUIRED_FIELDS: [&str; 7] = [
    "product_name",
    "materials",
    "transport",
    "packaging",
    "gwp",
    "cost",
    "circularity",
];

// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ecoscore-backend",
        "timestamp": Utc::now()
    }))
}

// Score a product: compute the sustainability score, rating and issues,
// fetch model suggestions, and record the submission
pub async fn calculate_score(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<ScoreResponse>> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| payload.get(**field).is_none())
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let request: ScoreRequest = serde_json::from_value(payload)?;

    let weights = request.weights.unwrap_or_default();
    let score = scoring::sustainability_score(
        request.gwp,
        request.circularity,
        request.cost,
        &weights,
    )?;
    let rating = scoring::rating_for(score);

    let suggestions = state.advisor.suggestions(&request, score, rating).await;

    let issues = scoring::extract_issues(&request.materials, &request.transport, &request.packaging);

    let timestamp = Utc::now();

    state
        .store
        .record(SubmissionRecord {
            id: Uuid::new_v4(),
            product_name: request.product_name.clone(),
            materials: request.materials,
            weight_grams: request.weight_grams,
            transport: request.transport,
            packaging: request.packaging,
            gwp: request.gwp,
            cost: request.cost,
            circularity: request.circularity,
            weights_used: weights,
            score,
            rating,
            suggestions: suggestions.clone(),
            issues: issues.clone(),
            timestamp,
        })
        .await;

    tracing::info!(
        "🌱 Scored product '{}': {} (rating {})",
        request.product_name,
        score,
        rating
    );

    Ok(Json(ScoreResponse {
        product_name: request.product_name,
        sustainability_score: score,
        rating,
        suggestions,
        issues,
        timestamp,
    }))
}

// All recorded submissions, newest first
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let submissions = state.store.history().await;

    Json(HistoryResponse {
        success: true,
        count: submissions.len(),
        submissions,
    })
}

// Aggregate statistics across all submissions
pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    Json(state.store.summary().await)
}

// Drop all recorded submissions
pub async fn clear_data(State(state): State<AppState>) -> Json<ClearResponse> {
    state.store.clear().await;

    tracing::info!("🧹 Cleared all submissions");

    Json(ClearResponse {
        success: true,
        message: "All data cleared".to_string(),
    })
}
