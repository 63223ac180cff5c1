//! Deposit API endpoints

use api_types::{
    Created,
    deposit::{DepositListResponse, DepositUpsert, DepositView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{DepositInput, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn input(payload: &DepositUpsert) -> DepositInput {
    DepositInput {
        date: payload.date,
        member_id: payload.member_id,
        amount: Money::new(payload.amount_minor),
    }
}

pub async fn deposit_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DepositUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .add_deposit(mess_id, month_id, input(&payload), &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DepositListResponse>, ServerError> {
    let deposits = state
        .engine
        .list_deposits(mess_id, month_id, &user.username)
        .await?
        .into_iter()
        .map(|d| DepositView {
            id: d.id,
            date: d.date,
            member_id: d.member_id,
            amount_minor: d.amount.minor(),
        })
        .collect();
    Ok(Json(DepositListResponse { deposits }))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, deposit_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DepositUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_deposit(mess_id, deposit_id, input(&payload), &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, deposit_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_deposit(mess_id, deposit_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
