//! Month report endpoints: meal rate, balance sheet, dashboard.

use api_types::report::{
    DashboardResponse, DashboardSlice, MealRateResponse, MemberBalance, MemberMealCost,
    MonthlyReportResponse, ReportTotals,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, mess::api_currency, server::ServerState, user};

pub async fn meal_rate(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MealRateResponse>, ServerError> {
    let report = state
        .engine
        .meal_rate(mess_id, month_id, &user.username)
        .await?;

    Ok(Json(MealRateResponse {
        total_meals: report.total_meals.as_f64(),
        total_bazar_minor: report.total_bazar.minor(),
        rate_per_meal: report.rate_per_meal,
        distributed_minor: report.distributed.minor(),
        members: report
            .members
            .into_iter()
            .map(|m| MemberMealCost {
                member_id: m.member_id,
                name: m.name,
                meals: m.meals.as_f64(),
                meal_cost_minor: m.meal_cost.minor(),
            })
            .collect(),
    }))
}

pub async fn monthly_report(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MonthlyReportResponse>, ServerError> {
    let mess = state.engine.mess(mess_id, &user.username).await?;
    let report = state
        .engine
        .monthly_report(mess_id, month_id, &user.username)
        .await?;
    let totals = report.totals;

    Ok(Json(MonthlyReportResponse {
        currency: api_currency(mess.currency),
        rate_per_meal: report.rate_per_meal,
        members: report
            .members
            .into_iter()
            .map(|m| MemberBalance {
                member_id: m.member_id,
                name: m.name,
                meals: m.meals.as_f64(),
                meal_cost_minor: m.meal_cost.minor(),
                bazar_minor: m.bazar.minor(),
                deposit_minor: m.deposit.minor(),
                shared_paid_minor: m.shared_paid.minor(),
                credit_minor: m.credit.minor(),
                shared_cost_minor: m.shared_cost.minor(),
                individual_cost_minor: m.individual_cost.minor(),
                total_cost_minor: m.total_cost.minor(),
                balance_minor: m.balance.minor(),
            })
            .collect(),
        totals: ReportTotals {
            meals: totals.meals.as_f64(),
            bazar_minor: totals.bazar.minor(),
            deposit_minor: totals.deposit.minor(),
            meal_cost_minor: totals.meal_cost.minor(),
            shared_cost_minor: totals.shared_cost.minor(),
            individual_cost_minor: totals.individual_cost.minor(),
            credit_minor: totals.credit.minor(),
            balance_minor: totals.balance.minor(),
        },
    }))
}

pub async fn dashboard(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((mess_id, month_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let dashboard = state
        .engine
        .dashboard(mess_id, month_id, &user.username)
        .await?;

    Ok(Json(DashboardResponse {
        member_count: dashboard.member_count,
        total_meals: dashboard.total_meals.as_f64(),
        total_bazar_minor: dashboard.total_bazar.minor(),
        total_deposit_minor: dashboard.total_deposit.minor(),
        rate_per_meal: dashboard.rate_per_meal,
        members: dashboard
            .members
            .into_iter()
            .map(|m| DashboardSlice {
                member_id: m.member_id,
                name: m.name,
                meals: m.meals.as_f64(),
                deposit_minor: m.deposit.minor(),
                meal_cost_minor: m.meal_cost.minor(),
            })
            .collect(),
    }))
}
