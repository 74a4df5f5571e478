//! HTTP API for the Press Quote engine.
//!
//! This module exposes a small JSON API around the pricing components
//! using the [`axum`](https://crates.io/crates/axum) framework.  Every
//! request is independent: it is priced against the table snapshot it
//! carries, or against the server's current snapshot when it carries
//! none.

use crate::card::price_card;
use crate::engine::price_suite;
use crate::envelope::price_envelope;
use crate::error::QuoteError;
use crate::models::{CardJob, CardPrice, EnvelopeJob, EnvelopePrice, SuiteItem, SuitePricing};
use crate::tables::PricingTables;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across requests.
pub struct AppState {
    pub tables: RwLock<PricingTables>,
}

/// Request to price a single item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest<T> {
    pub specification: T,
    /// Table snapshot to price against instead of the server's.
    #[serde(default)]
    pub tables: Option<PricingTables>,
}

/// Request to price a whole suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteRequest {
    pub items: Vec<SuiteItem>,
    #[serde(default)]
    pub tables: Option<PricingTables>,
}

/// Build the API router around the given table snapshot.  Returns the
/// router and a handle to the state.
pub fn build_router(tables: PricingTables) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        tables: RwLock::new(tables),
    });
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/tables", get(tables_handler))
        .route("/api/quote/card", post(card_handler))
        .route("/api/quote/envelope", post(envelope_handler))
        .route("/api/quote/suite", post(suite_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());
    (router, state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Handler for GET /api/tables
async fn tables_handler(State(app_state): State<Arc<AppState>>) -> Json<PricingTables> {
    Json(app_state.tables.read().await.clone())
}

/// Handler for POST /api/quote/card
async fn card_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest<CardJob>>,
) -> Result<Json<CardPrice>, ApiError> {
    let tables = resolve_tables(&app_state, request.tables).await;
    tables.card.validate()?;
    request.specification.check_color_counts()?;
    Ok(Json(price_card(&request.specification, &tables.card)))
}

/// Handler for POST /api/quote/envelope
async fn envelope_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest<EnvelopeJob>>,
) -> Result<Json<EnvelopePrice>, ApiError> {
    let tables = resolve_tables(&app_state, request.tables).await;
    tables.envelope.validate()?;
    Ok(Json(price_envelope(&request.specification, &tables.envelope)))
}

/// Handler for POST /api/quote/suite
///
/// Invalid rates do not fail the request; the affected items come back
/// unpriced.  The rayon fan-out runs on the blocking pool so a large
/// suite does not stall the async workers.
async fn suite_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<SuiteRequest>,
) -> Response {
    let tables = resolve_tables(&app_state, request.tables).await;
    let items = request.items;
    match tokio::task::spawn_blocking(move || price_suite(&items, &tables)).await {
        Ok(pricing) => (StatusCode::OK, Json::<SuitePricing>(pricing)).into_response(),
        Err(err) => {
            error!(error = %err, "suite pricing task failed");
            let body = Json(serde_json::json!({"error": err.to_string(), "code": "INTERNAL"}));
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}

async fn resolve_tables(app_state: &AppState, requested: Option<PricingTables>) -> PricingTables {
    match requested {
        Some(tables) => tables,
        None => app_state.tables.read().await.clone(),
    }
}

/// Error response carrying a [`QuoteError`].
#[derive(Debug)]
pub struct ApiError(QuoteError);

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            QuoteError::InvalidRateTable { .. }
            | QuoteError::InvalidQuantity { .. }
            | QuoteError::InvalidColorCount { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            QuoteError::TableLoad { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "error": self.0.to_string(),
            "code": self.0.error_code(),
        }));
        (status, body).into_response()
    }
}

/// Launch the API server.  Binds to `addr` and serves until Ctrl-C.
pub async fn serve(addr: &str, tables: PricingTables) -> Result<()> {
    let (router, _state) = build_router(tables);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn a7_card() -> Value {
        json!({
            "quantity": 25,
            "size": "a7",
            "paper": "lettra_pearl",
            "paperWeight": 110,
            "front": { "inkColors": 1 }
        })
    }

    #[tokio::test]
    async fn test_card_quote() {
        let (router, _) = build_router(PricingTables::default());
        let (status, body) =
            post_json(router, "/api/quote/card", json!({ "specification": a7_card() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "basePrice": 295,
                "edgePaintCost": 0,
                "dieCutCost": 0,
                "duplexCost": 0,
                "total": 295
            })
        );
    }

    #[tokio::test]
    async fn test_request_tables_override_server_tables() {
        let (router, _) = build_router(PricingTables::default());
        let mut tables = PricingTables::default();
        tables.card.rates.letterpress_iph = 0.0;
        let (status, body) = post_json(
            router,
            "/api/quote/card",
            json!({ "specification": a7_card(), "tables": tables }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], json!("INVALID_RATE_TABLE"));
    }

    #[tokio::test]
    async fn test_oversized_color_count_rejected() {
        let (router, _) = build_router(PricingTables::default());
        let mut card = a7_card();
        card["front"] = json!({ "inkColors": u32::MAX, "blindDeboss": true });
        let (status, body) =
            post_json(router, "/api/quote/card", json!({ "specification": card })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], json!("INVALID_COLOR_COUNT"));
    }

    #[tokio::test]
    async fn test_negative_envelope_cost_rejected() {
        let (router, _) = build_router(PricingTables::default());
        let mut tables = PricingTables::default();
        tables
            .envelope
            .envelope_costs
            .insert(crate::models::EnvelopeSize::A7, -0.75);
        let (status, body) = post_json(
            router,
            "/api/quote/envelope",
            json!({ "specification": { "quantity": 100, "size": "a7" }, "tables": tables }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("envelopeCosts.a7"));
    }

    #[tokio::test]
    async fn test_envelope_quote() {
        let (router, _) = build_router(PricingTables::default());
        let (status, body) = post_json(
            router,
            "/api/quote/envelope",
            json!({ "specification": { "quantity": 100, "size": "a7", "type": "single" } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "total": 75 }));
    }

    #[tokio::test]
    async fn test_suite_quote() {
        let (router, _) = build_router(PricingTables::default());
        let (status, body) = post_json(
            router,
            "/api/quote/suite",
            json!({
                "items": [
                    { "type": "card", "id": 1, "name": "Card #1", "options": a7_card() },
                    {
                        "type": "envelope",
                        "id": 2,
                        "name": "Envelopes",
                        "options": { "quantity": 100, "size": "a7" }
                    }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["grandTotal"], json!(370));
        assert_eq!(body["itemPrices"][1]["name"], json!("Envelopes"));
    }

    #[tokio::test]
    async fn test_tables_endpoint_reflects_state() {
        let (router, state) = build_router(PricingTables::default());
        state.tables.write().await.card.rates.base_labor_rate = 125.0;
        let request = Request::builder()
            .uri("/api/tables")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["card"]["rates"]["baseLaborRate"], json!(125.0));
    }
}
