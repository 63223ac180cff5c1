//! Market purchases ("bazar") for the shared kitchen.
//!
//! The bazar total of a month is what the meal rate distributes; the member
//! who shopped gets the amount credited.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bazar {
    pub id: Uuid,
    pub month_id: Uuid,
    pub date: NaiveDate,
    /// Member who paid for the shopping.
    pub member_id: Uuid,
    pub amount: Money,
    pub note: Option<String>,
}

/// Values of a bazar entry, used to add or replace one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BazarInput {
    pub date: NaiveDate,
    pub member_id: Uuid,
    pub amount: Money,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bazar")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub mess_id: String,
    pub month_id: String,
    pub date: NaiveDate,
    pub member_id: String,
    pub amount_minor: i64,
    pub note: Option<String>,
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

impl TryFrom<Model> for Bazar {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "bazar")?,
            month_id: parse_uuid(&model.month_id, "month")?,
            date: model.date,
            member_id: parse_uuid(&model.member_id, "member")?,
            amount: Money::new(model.amount_minor),
            note: model.note,
        })
    }
}
