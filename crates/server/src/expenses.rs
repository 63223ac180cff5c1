//! Expense API endpoints

use api_types::{
    Created,
    expense::{ExpenseKind, ExpenseListResponse, ExpenseUpsert, ExpenseView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{ExpenseInput, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn input(payload: ExpenseUpsert) -> ExpenseInput {
    ExpenseInput {
        date: payload.date,
        member_id: payload.member_id,
        amount: Money::new(payload.amount_minor),
        purpose: payload.purpose,
        kind: match payload.kind {
            ExpenseKind::Shared => engine::ExpenseKind::Shared,
            ExpenseKind::Individual => engine::ExpenseKind::Individual,
        },
    }
}

pub async fn expense_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseUpsert>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let id = state
        .engine
        .add_expense(mess_id, month_id, input(payload), &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(mess_id, month_id, &user.username)
        .await?
        .into_iter()
        .map(|e| ExpenseView {
            id: e.id,
            date: e.date,
            member_id: e.member_id,
            amount_minor: e.amount.minor(),
            purpose: e.purpose,
            kind: match e.kind {
                engine::ExpenseKind::Shared => ExpenseKind::Shared,
                engine::ExpenseKind::Individual => ExpenseKind::Individual,
            },
        })
        .collect();
    Ok(Json(ExpenseListResponse { expenses }))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_expense(mess_id, expense_id, input(payload), &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense(mess_id, expense_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
