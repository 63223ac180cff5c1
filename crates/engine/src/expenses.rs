//! Non-food expenses (rent, utilities, a member's own purchases...).
//!
//! A `Shared` expense is split evenly among all members and credited to the
//! payer; an `Individual` expense is charged to the payer alone.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Shared,
    Individual,
}

impl ExpenseKind {
    /// Canonical string stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Individual => "individual",
        }
    }
}

impl TryFrom<&str> for ExpenseKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "shared" => Ok(Self::Shared),
            "individual" => Ok(Self::Individual),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid expense kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub month_id: Uuid,
    pub date: NaiveDate,
    /// Member who paid.
    pub member_id: Uuid,
    pub amount: Money,
    pub purpose: String,
    pub kind: ExpenseKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseInput {
    pub date: NaiveDate,
    /// Payer.
    pub member_id: Uuid,
    pub amount: Money,
    pub purpose: String,
    pub kind: ExpenseKind,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub mess_id: String,
    pub month_id: String,
    pub date: NaiveDate,
    pub member_id: String,
    pub amount_minor: i64,
    pub purpose: String,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::months::Entity",
        from = "Column::MonthId",
        to = "super::months::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Month,
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::months::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Month.def()
    }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            month_id: parse_uuid(&model.month_id, "month")?,
            date: model.date,
            member_id: parse_uuid(&model.member_id, "member")?,
            amount: Money::new(model.amount_minor),
            purpose: model.purpose,
            kind: ExpenseKind::try_from(model.kind.as_str())?,
        })
    }
}
