use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tokio::task;
use tracing::instrument;

use super::state::AppState;
use crate::errors::{map_join_error, AppError, Result};
use crate::services::CreateOrder;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

// ── Orders ─────────────────────────────────────────────────────────

#[instrument(skip_all)]
pub(super) async fn create_order(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(input) =
        payload.map_err(|rej| AppError::Validation(format!("Invalid JSON: {}", rej.body_text())))?;
    let order = state.service.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "order": order }))))
}

#[instrument(skip(state))]
pub(super) async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let order = state.service.get_order(parse_order_id(&id)?).await?;
    Ok(Json(json!({ "order": order })))
}

#[instrument(skip(state))]
pub(super) async fn order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let order = state.service.get_order(parse_order_id(&id)?).await?;
    Ok(Json(json!({
        "order_number": order.order_number,
        "status": order.status,
        "reddio_status": order.reddio_status,
        "reddio_pay_link": order.reddio_pay_link,
        "transaction_hash": order.transaction_hash,
        "paid_at": order.paid_at,
    })))
}

#[instrument(skip(state))]
pub(super) async fn check_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let order = state.service.check_payment(parse_order_id(&id)?).await?;
    Ok(Json(json!({
        "message": "Payment status updated",
        "order_number": order.order_number,
        "status": order.status,
        "reddio_status": order.reddio_status,
        "transaction_hash": order.transaction_hash,
        "paid_at": order.paid_at,
    })))
}

/// `GET /api/orders?page&limit&status`. Unparseable paging values fall back
/// to defaults instead of failing the request.
#[instrument(skip(state))]
pub(super) async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let (page, limit) = page_params(&params);
    let status = params.get("status").filter(|s| !s.is_empty()).cloned();

    let (orders, total) = state.service.list_orders(page, limit, status).await?;
    let total_pages = (total + i64::from(limit) - 1) / i64::from(limit);

    Ok(Json(json!({
        "orders": orders,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "total_pages": total_pages,
        },
    })))
}

// ── Health ─────────────────────────────────────────────────────────

pub(super) async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    let db = state.db.clone();
    task::spawn_blocking(move || db.health_check()).await.map_err(map_join_error)??;
    Ok(Json(json!({ "status": "ok" })))
}

// ── Helpers ────────────────────────────────────────────────────────

fn parse_order_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| AppError::Validation("Invalid order ID".to_string()))
}

fn page_params(params: &HashMap<String, String>) -> (u32, u32) {
    let parse = |key: &str| params.get(key).and_then(|v| v.trim().parse::<i64>().ok());

    let page = parse("page").filter(|p| *p >= 1).and_then(|p| u32::try_from(p).ok()).unwrap_or(1);
    let limit = parse("limit")
        .filter(|l| (1..=i64::from(MAX_PAGE_SIZE)).contains(l))
        .and_then(|l| u32::try_from(l).ok())
        .unwrap_or(DEFAULT_PAGE_SIZE);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn page_params_clamp_to_defaults() {
        assert_eq!(page_params(&params(&[])), (1, 10));
        assert_eq!(page_params(&params(&[("page", "3"), ("limit", "25")])), (3, 25));
        assert_eq!(page_params(&params(&[("page", "0"), ("limit", "0")])), (1, 10));
        assert_eq!(page_params(&params(&[("page", "-4"), ("limit", "101")])), (1, 10));
        assert_eq!(page_params(&params(&[("page", "abc"), ("limit", "100")])), (1, 100));
    }

    #[test]
    fn order_ids_must_be_integers() {
        assert_eq!(parse_order_id("42").unwrap(), 42);
        assert!(matches!(parse_order_id("abc"), Err(AppError::Validation(_))));
        assert!(parse_order_id("").is_err());
    }
}
