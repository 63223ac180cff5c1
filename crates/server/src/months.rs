//! Month API endpoints

use api_types::{
    Created,
    month::{MonthListResponse, MonthNew, MonthView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub async fn month_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(mess_id): Path<Uuid>,
    Json(payload): Json<MonthNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_month(
            mess_id,
            &payload.code,
            payload.name.as_deref(),
            &user.username,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(mess_id): Path<Uuid>,
) -> Result<Json<MonthListResponse>, ServerError> {
    let months = state
        .engine
        .list_months(mess_id, &user.username)
        .await?
        .into_iter()
        .map(|month| MonthView {
            id: month.id,
            code: month.code,
            name: month.name,
            created_at: month.created_at,
        })
        .collect();
    Ok(Json(MonthListResponse { months }))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_month(mess_id, month_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
