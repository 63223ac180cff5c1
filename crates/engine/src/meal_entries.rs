//! One row per (meal day, member). Counts are stored in halves.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    DayMeals, EngineError, MealCount, meal_days::MealEntry, util::parse_uuid,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "meal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub meal_day_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: String,
    pub breakfast_halves: i64,
    pub lunch_halves: i64,
    pub dinner_halves: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meal_days::Entity",
        from = "Column::MealDayId",
        to = "super::meal_days::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    MealDay,
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::meal_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealDay.def()
    }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_entry(meal_day_id: Uuid, entry: &MealEntry) -> Self {
        Self {
            meal_day_id: ActiveValue::Set(meal_day_id.to_string()),
            member_id: ActiveValue::Set(entry.member_id.to_string()),
            breakfast_halves: ActiveValue::Set(entry.meals.breakfast.halves()),
            lunch_halves: ActiveValue::Set(entry.meals.lunch.halves()),
            dinner_halves: ActiveValue::Set(entry.meals.dinner.halves()),
        }
    }
}

impl TryFrom<Model> for MealEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            member_id: parse_uuid(&model.member_id, "member")?,
            meals: DayMeals::new(
                MealCount::from_halves(model.breakfast_halves)?,
                MealCount::from_halves(model.lunch_halves)?,
                MealCount::from_halves(model.dinner_halves)?,
            ),
        })
    }
}
