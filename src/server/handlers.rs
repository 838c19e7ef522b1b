//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::models::quote::Quote;
use crate::server::error::ApiError;
use crate::server::state::AppState;

const SOURCE_NAME: &str = "NSE";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub source: &'static str,
    pub data: Quote,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /stock/:symbol
pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let quote = state.quotes.get_quote(&symbol).await?;
    Ok(Json(QuoteResponse {
        success: true,
        source: SOURCE_NAME,
        data: quote,
    }))
}
