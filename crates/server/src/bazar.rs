//! Bazar API endpoints

use api_types::{
    Created,
    bazar::{BazarListResponse, BazarUpsert, BazarView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{BazarInput, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn input(payload: BazarUpsert) -> BazarInput {
    BazarInput {
        date: payload.date,
        member_id: payload.member_id,
        amount: Money::new(payload.amount_minor),
        note: payload.note,
    }
}

pub async fn bazar_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<BazarUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .add_bazar(mess_id, month_id, input(payload), &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BazarListResponse>, ServerError> {
    let bazar = state
        .engine
        .list_bazar(mess_id, month_id, &user.username)
        .await?
        .into_iter()
        .map(|b| BazarView {
            id: b.id,
            date: b.date,
            member_id: b.member_id,
            amount_minor: b.amount.minor(),
            note: b.note,
        })
        .collect();
    Ok(Json(BazarListResponse { bazar }))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, bazar_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<BazarUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_bazar(mess_id, bazar_id, input(payload), &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, bazar_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_bazar(mess_id, bazar_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
