//! Accounting months. Every record (meals, bazar, deposits, expenses) is
//! filed under one month of one mess.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{
    EngineError,
    util::{ensure_date_in_month, parse_uuid},
};

/// A calendar month of a mess, identified by its `YYYY-MM` code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Month {
    pub id: Uuid,
    pub mess_id: Uuid,
    /// `YYYY-MM`.
    pub code: String,
    /// Display label, e.g. "July 2025".
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Month {
    /// Returns `true` if `date` belongs to this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        ensure_date_in_month(date, &self.code).is_ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "months")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub mess_id: String,
    pub code: String,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::messes::Entity",
        from = "Column::MessId",
        to = "super::messes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Mess,
}

impl Related<super::messes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mess.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Month {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "month")?,
            mess_id: parse_uuid(&model.mess_id, "mess")?,
            code: model.code,
            name: model.name,
            created_at: model.created_at,
        })
    }
}
