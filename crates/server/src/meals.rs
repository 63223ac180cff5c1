//! Meal sheet API endpoints

use api_types::{
    Created,
    meal::{MealDayListResponse, MealDayNew, MealDayUpdate, MealDayView, MealEntry},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{DayMeals, EngineError, MealCount};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn engine_entries(entries: &[MealEntry]) -> Result<Vec<engine::MealEntry>, EngineError> {
    entries
        .iter()
        .map(|entry| {
            Ok(engine::MealEntry {
                member_id: entry.member_id,
                meals: DayMeals::new(
                    MealCount::try_from(entry.breakfast)?,
                    MealCount::try_from(entry.lunch)?,
                    MealCount::try_from(entry.dinner)?,
                ),
            })
        })
        .collect()
}

fn view(day: engine::MealDay) -> MealDayView {
    MealDayView {
        id: day.id,
        date: day.date,
        total: day.total().as_f64(),
        entries: day
            .entries
            .iter()
            .map(|entry| MealEntry {
                member_id: entry.member_id,
                breakfast: entry.meals.breakfast.as_f64(),
                lunch: entry.meals.lunch.as_f64(),
                dinner: entry.meals.dinner.as_f64(),
            })
            .collect(),
    }
}

pub async fn meal_day_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MealDayNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let entries = engine_entries(&payload.entries)?;
    let id = state
        .engine
        .record_meal_day(mess_id, month_id, payload.date, &entries, &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// Meal sheets of a month, ordered by date.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MealDayListResponse>, ServerError> {
    let meal_days = state
        .engine
        .list_meal_days(mess_id, month_id, &user.username)
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(MealDayListResponse { meal_days }))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, meal_day_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MealDayUpdate>,
) -> Result<StatusCode, ServerError> {
    let entries = engine_entries(&payload.entries)?;
    state
        .engine
        .update_meal_day(mess_id, meal_day_id, &entries, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, meal_day_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_meal_day(mess_id, meal_day_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
