use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Mess, ResultEngine, bazar, deposits, expenses, meal_days, members,
    messes, months, util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new mess owned by `user_id`.
    ///
    /// Names are unique per owner, ignoring case.
    pub async fn new_mess(
        &self,
        name: &str,
        user_id: &str,
        currency: Option<Currency>,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "mess")?;
        let mess = Mess::new(name.clone(), user_id, currency.unwrap_or_default());
        let mess_model: messes::ActiveModel = (&mess).into();
        with_tx!(self, |db_tx| {
            let exists = messes::Entity::find()
                .filter(messes::Column::UserId.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            mess_model.insert(&db_tx).await?;
            tracing::info!(mess_id = %mess.id, user_id, "mess created");
            Ok(mess.id)
        })
    }

    /// Return a mess of `user_id`.
    pub async fn mess(&self, mess_id: Uuid, user_id: &str) -> ResultEngine<Mess> {
        with_tx!(self, |db_tx| {
            let model = self.require_mess(&db_tx, mess_id, user_id).await?;
            Mess::try_from(model)
        })
    }

    /// Every mess owned by `user_id`, ordered by name.
    pub async fn list_messes(&self, user_id: &str) -> ResultEngine<Vec<Mess>> {
        with_tx!(self, |db_tx| {
            let models = messes::Entity::find()
                .filter(messes::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(messes::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Mess::try_from).collect()
        })
    }

    pub async fn rename_mess(&self, mess_id: Uuid, new_name: &str, user_id: &str) -> ResultEngine<()> {
        let new_name = normalize_required_name(new_name, "mess")?;
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;

            let exists = messes::Entity::find()
                .filter(messes::Column::UserId.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(new_name.to_lowercase()))
                .filter(messes::Column::Id.ne(mess_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(new_name));
            }

            messes::ActiveModel {
                id: ActiveValue::Set(mess_id.to_string()),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Delete a mess with every month, member and record in it.
    pub async fn delete_mess(&self, mess_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let mess_id = mess_id.to_string();
            let backend = self.database.get_database_backend();

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM meal_entries WHERE meal_day_id IN (SELECT id FROM meal_days WHERE mess_id = ?);",
                    vec![mess_id.clone().into()],
                ))
                .await?;
            meal_days::Entity::delete_many()
                .filter(meal_days::Column::MessId.eq(mess_id.clone()))
                .exec(&db_tx)
                .await?;
            bazar::Entity::delete_many()
                .filter(bazar::Column::MessId.eq(mess_id.clone()))
                .exec(&db_tx)
                .await?;
            deposits::Entity::delete_many()
                .filter(deposits::Column::MessId.eq(mess_id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_many()
                .filter(expenses::Column::MessId.eq(mess_id.clone()))
                .exec(&db_tx)
                .await?;
            members::Entity::delete_many()
                .filter(members::Column::MessId.eq(mess_id.clone()))
                .exec(&db_tx)
                .await?;
            months::Entity::delete_many()
                .filter(months::Column::MessId.eq(mess_id.clone()))
                .exec(&db_tx)
                .await?;
            messes::Entity::delete_by_id(mess_id.clone())
                .exec(&db_tx)
                .await?;

            tracing::info!(%mess_id, "mess deleted");
            Ok(())
        })
    }
}
