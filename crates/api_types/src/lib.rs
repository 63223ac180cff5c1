//! JSON bodies of the messbook HTTP API.
//!
//! Amounts travel as integer minor units (`*_minor`), meal counts as
//! decimal numbers in half steps (`1.5`), dates as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Bdt,
    Eur,
}

/// Response of every create endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod mess {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MessNew {
        pub name: String,
        pub currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MessRename {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MessView {
        pub id: Uuid,
        pub name: String,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MessListResponse {
        pub messes: Vec<MessView>,
    }
}

pub mod month {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthNew {
        /// `YYYY-MM`.
        pub code: String,
        /// Display label; derived from the code when absent.
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        pub id: Uuid,
        pub code: String,
        pub name: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthListResponse {
        pub months: Vec<MonthView>,
    }
}

pub mod member {
    use super::*;

    /// Request body for adding or renaming a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberUpsert {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberListResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod meal {
    use super::*;

    /// Meals of one member on one day. Missing fields are zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct MealEntry {
        pub member_id: Uuid,
        #[serde(default)]
        pub breakfast: f64,
        #[serde(default)]
        pub lunch: f64,
        #[serde(default)]
        pub dinner: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MealDayNew {
        pub date: NaiveDate,
        pub entries: Vec<MealEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MealDayUpdate {
        pub entries: Vec<MealEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MealDayView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub total: f64,
        pub entries: Vec<MealEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MealDayListResponse {
        pub meal_days: Vec<MealDayView>,
    }
}

pub mod bazar {
    use super::*;

    /// Request body for adding or replacing a bazar entry.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BazarUpsert {
        pub date: NaiveDate,
        pub member_id: Uuid,
        pub amount_minor: i64,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BazarView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub member_id: Uuid,
        pub amount_minor: i64,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BazarListResponse {
        pub bazar: Vec<BazarView>,
    }
}

pub mod deposit {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositUpsert {
        pub date: NaiveDate,
        pub member_id: Uuid,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub member_id: Uuid,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositListResponse {
        pub deposits: Vec<DepositView>,
    }
}

pub mod expense {
    use super::*;

    /// `shared` expenses are split among all members, `individual` ones are
    /// charged to the payer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseKind {
        Shared,
        Individual,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpsert {
        pub date: NaiveDate,
        /// Member who paid.
        pub member_id: Uuid,
        pub amount_minor: i64,
        pub purpose: String,
        pub kind: ExpenseKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub member_id: Uuid,
        pub amount_minor: i64,
        pub purpose: String,
        pub kind: ExpenseKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberMealCost {
        pub member_id: Uuid,
        pub name: String,
        pub meals: f64,
        pub meal_cost_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MealRateResponse {
        pub total_meals: f64,
        pub total_bazar_minor: i64,
        /// Exact cost of one meal in major units.
        pub rate_per_meal: f64,
        pub distributed_minor: i64,
        pub members: Vec<MemberMealCost>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberBalance {
        pub member_id: Uuid,
        pub name: String,
        pub meals: f64,
        pub meal_cost_minor: i64,
        pub bazar_minor: i64,
        pub deposit_minor: i64,
        pub shared_paid_minor: i64,
        pub credit_minor: i64,
        pub shared_cost_minor: i64,
        pub individual_cost_minor: i64,
        pub total_cost_minor: i64,
        /// Positive: the mess owes the member. Negative: the member owes the mess.
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportTotals {
        pub meals: f64,
        pub bazar_minor: i64,
        pub deposit_minor: i64,
        pub meal_cost_minor: i64,
        pub shared_cost_minor: i64,
        pub individual_cost_minor: i64,
        pub credit_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyReportResponse {
        pub currency: Currency,
        pub rate_per_meal: f64,
        pub members: Vec<MemberBalance>,
        pub totals: ReportTotals,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardSlice {
        pub member_id: Uuid,
        pub name: String,
        pub meals: f64,
        pub deposit_minor: i64,
        pub meal_cost_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        pub member_count: usize,
        pub total_meals: f64,
        pub total_bazar_minor: i64,
        pub total_deposit_minor: i64,
        pub rate_per_meal: f64,
        pub members: Vec<DashboardSlice>,
    }
}
