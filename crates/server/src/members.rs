//! Member API endpoints

use api_types::{
    Created,
    member::{MemberListResponse, MemberUpsert, MemberView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub async fn member_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(mess_id): Path<Uuid>,
    Json(payload): Json<MemberUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_member(mess_id, &payload.name, &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// Members in name order.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(mess_id): Path<Uuid>,
) -> Result<Json<MemberListResponse>, ServerError> {
    let members = state
        .engine
        .list_members(mess_id, &user.username)
        .await?
        .into_iter()
        .map(|member| MemberView {
            id: member.id,
            name: member.name,
        })
        .collect();
    Ok(Json(MemberListResponse { members }))
}

pub async fn rename(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, member_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MemberUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .rename_member(mess_id, member_id, &payload.name, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a member and every record that references them.
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_member(mess_id, member_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
