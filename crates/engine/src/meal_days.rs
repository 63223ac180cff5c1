//! Daily meal sheets.
//!
//! A `MealDay` is one date of a month with the meals eaten by each member
//! that day. There is at most one sheet per date and month. The per-member
//! rows live in [`meal_entries`](super::meal_entries).

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{DayMeals, EngineError, MealCount, meal_entries, util::parse_uuid};

/// Meals of one member inside a [`MealDay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MealEntry {
    pub member_id: Uuid,
    pub meals: DayMeals,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealDay {
    pub id: Uuid,
    pub month_id: Uuid,
    pub date: NaiveDate,
    pub entries: Vec<MealEntry>,
}

impl MealDay {
    /// Meals eaten by everybody that day.
    pub fn total(&self) -> MealCount {
        self.entries.iter().map(|entry| entry.meals.total()).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "meal_days")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub mess_id: String,
    pub month_id: String,
    pub date: NaiveDate,
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
    #[sea_orm(has_many = "super::meal_entries::Entity")]
    Entries,
}

impl Related<super::months::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Month.def()
    }
}

impl Related<super::meal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, Vec<meal_entries::Model>)> for MealDay {
    type Error = EngineError;

    fn try_from((model, entries): (Model, Vec<meal_entries::Model>)) -> Result<Self, Self::Error> {
        let entries = entries
            .into_iter()
            .map(MealEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: parse_uuid(&model.id, "meal day")?,
            month_id: parse_uuid(&model.month_id, "month")?,
            date: model.date,
            entries,
        })
    }
}
