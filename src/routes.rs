//! HTTP handlers.
//!
//! Every endpoint speaks the `{ success, ... }` envelope the client expects.
//! Store failures are logged server-side and surfaced as a 500 with a fixed
//! message; internal detail never reaches the client.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{menu::MenuItemResponse, state::AppState};

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct MenuListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<MenuItemResponse>,
}

#[derive(Serialize)]
pub struct RandomItemResponse {
    pub success: bool,
    pub data: MenuItemResponse,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: &'static str,
}

fn failure(status: StatusCode, message: &'static str) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message,
        }),
    )
        .into_response()
}

pub async fn root_handler() -> impl IntoResponse {
    Json(BannerResponse {
        message: "Coffee Shop API",
    })
}

pub async fn menu_handler(State(state): State<Arc<AppState>>) -> Response {
    info!("GET /menu");

    match state.store.list_sorted().await {
        Ok(items) => {
            info!("Returning {} items", items.len());
            let data: Vec<MenuItemResponse> = items.into_iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(MenuListResponse {
                    success: true,
                    count: data.len(),
                    data,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("Menu listing failed: {err}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch menu items",
            )
        }
    }
}

#[derive(Deserialize)]
pub struct RandomParams {
    pub exclude: Option<String>,
}

pub async fn random_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomParams>,
) -> Response {
    info!("GET /menu/random");

    // A stale or malformed exclude id is dropped rather than rejected, so the
    // "surprise me" button keeps working with whatever the client sends.
    let exclude = params
        .exclude
        .as_deref()
        .and_then(|raw| ObjectId::parse_str(raw).ok());

    match state.store.sample_in_stock(exclude).await {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(RandomItemResponse {
                success: true,
                data: item.into(),
            }),
        )
            .into_response(),
        Ok(None) => failure(StatusCode::NOT_FOUND, "No in-stock items available"),
        Err(err) => {
            error!("Random item query failed: {err}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch random item",
            )
        }
    }
}
