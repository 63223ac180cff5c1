use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, MealDay, MealEntry, ResultEngine, meal_days, meal_entries,
    util::ensure_date_in_month,
};

use super::{Engine, with_tx};

/// Reject duplicated members and sheets without a single meal.
fn validate_entries(entries: &[MealEntry]) -> ResultEngine<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.member_id) {
            return Err(EngineError::InvalidArgument(format!(
                "member {} listed twice",
                entry.member_id
            )));
        }
    }
    if entries.iter().all(|entry| entry.meals.is_empty()) {
        return Err(EngineError::InvalidAmount(
            "at least one meal is required".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    async fn insert_entries(
        &self,
        db: &DatabaseTransaction,
        meal_day_id: Uuid,
        entries: &[MealEntry],
    ) -> ResultEngine<()> {
        let models: Vec<meal_entries::ActiveModel> = entries
            .iter()
            .filter(|entry| !entry.meals.is_empty())
            .map(|entry| meal_entries::ActiveModel::from_entry(meal_day_id, entry))
            .collect();
        meal_entries::Entity::insert_many(models).exec(db).await?;
        Ok(())
    }

    /// Meal days of a month with their entries, ordered by date.
    pub(super) async fn meal_days_of_month(
        &self,
        db: &DatabaseTransaction,
        month_id: Uuid,
    ) -> ResultEngine<Vec<MealDay>> {
        let day_models = meal_days::Entity::find()
            .filter(meal_days::Column::MonthId.eq(month_id.to_string()))
            .order_by_asc(meal_days::Column::Date)
            .all(db)
            .await?;
        if day_models.is_empty() {
            return Ok(Vec::new());
        }

        let entry_models = meal_entries::Entity::find()
            .filter(meal_entries::Column::MealDayId.is_in(day_models.iter().map(|d| d.id.clone())))
            .order_by_asc(meal_entries::Column::MemberId)
            .all(db)
            .await?;
        let mut by_day: HashMap<String, Vec<meal_entries::Model>> = HashMap::new();
        for entry in entry_models {
            by_day.entry(entry.meal_day_id.clone()).or_default().push(entry);
        }

        day_models
            .into_iter()
            .map(|day| {
                let entries = by_day.remove(&day.id).unwrap_or_default();
                MealDay::try_from((day, entries))
            })
            .collect()
    }

    /// Record the meals of one date.
    ///
    /// Members with no meal that day may be listed; they are not stored.
    pub async fn record_meal_day(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        date: NaiveDate,
        entries: &[MealEntry],
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        validate_entries(entries)?;
        let meal_day_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let month = self.require_month(&db_tx, mess_id, month_id).await?;
            ensure_date_in_month(date, &month.code)?;
            self.require_members(&db_tx, mess_id, entries.iter().map(|e| e.member_id))
                .await?;

            let exists = meal_days::Entity::find()
                .filter(meal_days::Column::MonthId.eq(month_id.to_string()))
                .filter(meal_days::Column::Date.eq(date))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(format!("meals of {date}")));
            }

            meal_days::ActiveModel {
                id: ActiveValue::Set(meal_day_id.to_string()),
                mess_id: ActiveValue::Set(mess_id.to_string()),
                month_id: ActiveValue::Set(month_id.to_string()),
                date: ActiveValue::Set(date),
            }
            .insert(&db_tx)
            .await?;
            self.insert_entries(&db_tx, meal_day_id, entries).await?;

            tracing::info!(%mess_id, %meal_day_id, %date, "meals recorded");
            Ok(meal_day_id)
        })
    }

    /// Replace every entry of a meal day.
    pub async fn update_meal_day(
        &self,
        mess_id: Uuid,
        meal_day_id: Uuid,
        entries: &[MealEntry],
        user_id: &str,
    ) -> ResultEngine<()> {
        validate_entries(entries)?;
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_meal_day(&db_tx, mess_id, meal_day_id).await?;
            self.require_members(&db_tx, mess_id, entries.iter().map(|e| e.member_id))
                .await?;

            meal_entries::Entity::delete_many()
                .filter(meal_entries::Column::MealDayId.eq(meal_day_id.to_string()))
                .exec(&db_tx)
                .await?;
            self.insert_entries(&db_tx, meal_day_id, entries).await?;
            Ok(())
        })
    }

    pub async fn delete_meal_day(
        &self,
        mess_id: Uuid,
        meal_day_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_meal_day(&db_tx, mess_id, meal_day_id).await?;

            meal_entries::Entity::delete_many()
                .filter(meal_entries::Column::MealDayId.eq(meal_day_id.to_string()))
                .exec(&db_tx)
                .await?;
            meal_days::Entity::delete_by_id(meal_day_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub async fn meal_day(
        &self,
        mess_id: Uuid,
        meal_day_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<MealDay> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let day = self.require_meal_day(&db_tx, mess_id, meal_day_id).await?;
            let entries = meal_entries::Entity::find()
                .filter(meal_entries::Column::MealDayId.eq(day.id.clone()))
                .order_by_asc(meal_entries::Column::MemberId)
                .all(&db_tx)
                .await?;
            MealDay::try_from((day, entries))
        })
    }

    /// Meal days of a month, ordered by date.
    pub async fn list_meal_days(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<MealDay>> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_month(&db_tx, mess_id, month_id).await?;
            self.meal_days_of_month(&db_tx, month_id).await
        })
    }
}
