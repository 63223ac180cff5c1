//! Mess API endpoints

use api_types::{
    Created,
    mess::{MessListResponse, MessNew, MessRename, MessView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn engine_currency(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Bdt => engine::Currency::Bdt,
        api_types::Currency::Eur => engine::Currency::Eur,
    }
}

pub(crate) fn api_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Bdt => api_types::Currency::Bdt,
        engine::Currency::Eur => api_types::Currency::Eur,
    }
}

fn view(mess: engine::Mess) -> MessView {
    MessView {
        id: mess.id,
        name: mess.name,
        currency: api_currency(mess.currency),
    }
}

/// Handle requests for creating a new mess
pub async fn mess_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<MessNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .new_mess(
            &payload.name,
            &user.username,
            payload.currency.map(engine_currency),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<MessListResponse>, ServerError> {
    let messes = state
        .engine
        .list_messes(&user.username)
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(MessListResponse { messes }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(mess_id): Path<Uuid>,
) -> Result<Json<MessView>, ServerError> {
    let mess = state.engine.mess(mess_id, &user.username).await?;
    Ok(Json(view(mess)))
}

pub async fn rename(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(mess_id): Path<Uuid>,
    Json(payload): Json<MessRename>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .rename_mess(mess_id, &payload.name, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(mess_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_mess(mess_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
