//! HTTP surface of the kitchen.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::core::{Kitchen, KitchenError, Order, Spawn};
use crate::runtime::api::{self, Health, KitchenSnapshot, OrderAccepted};

/// Error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

/// Routes: `POST /order`, `GET /health`, `GET /stats`.
pub fn router<S>(kitchen: Arc<Kitchen<S>>) -> Router
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/order", post(receive_order::<S>))
        .route("/health", get(health::<S>))
        .route("/stats", get(stats::<S>))
        .with_state(kitchen)
}

async fn receive_order<S>(
    State(kitchen): State<Arc<Kitchen<S>>>,
    payload: Result<Json<Order>, JsonRejection>,
) -> Result<Json<OrderAccepted>, (StatusCode, Json<ErrorBody>)>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let Json(order) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "malformed order refused");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: rejection.body_text(),
            }),
        )
    })?;
    api::submit_order(&kitchen, order).map(Json).map_err(|e| {
        let status = match e {
            KitchenError::InvalidOrder { .. } => StatusCode::BAD_REQUEST,
            KitchenError::ShutDown => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: e.to_string() }))
    })
}

async fn health<S>(State(kitchen): State<Arc<Kitchen<S>>>) -> Json<Health>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    Json(api::health(&kitchen))
}

async fn stats<S>(State(kitchen): State<Arc<Kitchen<S>>>) -> Json<KitchenSnapshot>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    Json(api::snapshot(&kitchen))
}
