use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Month, ResultEngine, bazar, deposits, expenses, meal_days, months,
    util::{normalize_optional_text, parse_month_code},
};

use super::{Engine, with_tx};

impl Engine {
    /// Open a month in a mess.
    ///
    /// `code` is `YYYY-MM`. Without a `name` the label is derived from the
    /// code ("July 2025").
    pub async fn new_month(
        &self,
        mess_id: Uuid,
        code: &str,
        name: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let first_day = parse_month_code(code)?;
        let code = code.trim().to_string();
        let name =
            normalize_optional_text(name).unwrap_or_else(|| first_day.format("%B %Y").to_string());
        let month_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;

            let exists = months::Entity::find()
                .filter(months::Column::MessId.eq(mess_id.to_string()))
                .filter(months::Column::Code.eq(code.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(code));
            }

            months::ActiveModel {
                id: ActiveValue::Set(month_id.to_string()),
                mess_id: ActiveValue::Set(mess_id.to_string()),
                code: ActiveValue::Set(code.clone()),
                name: ActiveValue::Set(name),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%mess_id, %month_id, %code, "month opened");
            Ok(month_id)
        })
    }

    pub async fn month(&self, mess_id: Uuid, month_id: Uuid, user_id: &str) -> ResultEngine<Month> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let model = self.require_month(&db_tx, mess_id, month_id).await?;
            Month::try_from(model)
        })
    }

    /// Months of a mess, oldest first.
    pub async fn list_months(&self, mess_id: Uuid, user_id: &str) -> ResultEngine<Vec<Month>> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let models = months::Entity::find()
                .filter(months::Column::MessId.eq(mess_id.to_string()))
                .order_by_asc(months::Column::Code)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Month::try_from).collect()
        })
    }

    /// Delete a month and every record filed under it.
    pub async fn delete_month(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_month(&db_tx, mess_id, month_id).await?;
            let month_id = month_id.to_string();
            let backend = self.database.get_database_backend();

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM meal_entries WHERE meal_day_id IN (SELECT id FROM meal_days WHERE month_id = ?);",
                    vec![month_id.clone().into()],
                ))
                .await?;
            meal_days::Entity::delete_many()
                .filter(meal_days::Column::MonthId.eq(month_id.clone()))
                .exec(&db_tx)
                .await?;
            bazar::Entity::delete_many()
                .filter(bazar::Column::MonthId.eq(month_id.clone()))
                .exec(&db_tx)
                .await?;
            deposits::Entity::delete_many()
                .filter(deposits::Column::MonthId.eq(month_id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_many()
                .filter(expenses::Column::MonthId.eq(month_id.clone()))
                .exec(&db_tx)
                .await?;
            months::Entity::delete_by_id(month_id.clone())
                .exec(&db_tx)
                .await?;

            tracing::info!(%mess_id, %month_id, "month deleted");
            Ok(())
        })
    }
}
