//! Messbook engine: monthly accounting of a shared household.
//!
//! The crate contains:
//! - the fair-share [`allocate`] function that splits a total into whole
//!   units by largest remainder;
//! - the domain types ([`Mess`], [`Month`], [`Member`], [`MealDay`],
//!   [`Bazar`], [`Deposit`], [`Expense`]) and their sea-orm entities;
//! - the [`Engine`], which runs every record operation against an injected
//!   database connection;
//! - the month reports (meal rate, balances, dashboard).

pub use allocation::{Allocation, Participant, allocate, split_evenly};
pub use bazar::{Bazar, BazarInput};
pub use currency::Currency;
pub use deposits::{Deposit, DepositInput};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseInput, ExpenseKind};
pub use meal_days::{MealDay, MealEntry};
pub use meals::{DayMeals, MealCount};
pub use members::Member;
pub use messes::Mess;
pub use money::Money;
pub use months::Month;
pub use ops::{DEFAULT_ALLOCATION_UNIT, Engine, EngineBuilder};
pub use report::{
    Dashboard, DashboardSlice, MealRateReport, MemberBalance, MemberMealCost, MonthLedger,
    MonthlyReport, ReportTotals,
};

mod allocation;
mod bazar;
mod currency;
mod deposits;
mod error;
mod expenses;
mod meal_days;
mod meal_entries;
mod meals;
mod members;
mod messes;
mod money;
mod months;
mod ops;
mod report;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
