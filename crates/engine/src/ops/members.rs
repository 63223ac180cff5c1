use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, Statement, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Member, ResultEngine, bazar, deposits, expenses, meal_entries, members,
    util::{member_name_key, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    async fn ensure_member_name_free(
        &self,
        db: &DatabaseTransaction,
        mess_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = members::Entity::find()
            .filter(members::Column::MessId.eq(mess_id.to_string()))
            .filter(members::Column::NameNorm.eq(member_name_key(name)));
        if let Some(id) = except {
            query = query.filter(members::Column::Id.ne(id.to_string()));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }

    /// Add a member to a mess. Names are unique per mess, ignoring case
    /// and spacing.
    pub async fn new_member(&self, mess_id: Uuid, name: &str, user_id: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "member")?;
        let member_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.ensure_member_name_free(&db_tx, mess_id, &name, None)
                .await?;

            members::ActiveModel {
                id: ActiveValue::Set(member_id.to_string()),
                mess_id: ActiveValue::Set(mess_id.to_string()),
                name_norm: ActiveValue::Set(member_name_key(&name)),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%mess_id, %member_id, "member added");
            Ok(member_id)
        })
    }

    pub async fn rename_member(
        &self,
        mess_id: Uuid,
        member_id: Uuid,
        new_name: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        let new_name = normalize_required_name(new_name, "member")?;
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_member(&db_tx, mess_id, member_id).await?;
            self.ensure_member_name_free(&db_tx, mess_id, &new_name, Some(member_id))
                .await?;

            members::ActiveModel {
                id: ActiveValue::Set(member_id.to_string()),
                name_norm: ActiveValue::Set(member_name_key(&new_name)),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Members of a mess ordered by name.
    ///
    /// This is also the order the meal cost allocation breaks ties in.
    pub async fn list_members(&self, mess_id: Uuid, user_id: &str) -> ResultEngine<Vec<Member>> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.members_by_name(&db_tx, mess_id).await
        })
    }

    pub(super) async fn members_by_name(
        &self,
        db: &DatabaseTransaction,
        mess_id: Uuid,
    ) -> ResultEngine<Vec<Member>> {
        let models = members::Entity::find()
            .filter(members::Column::MessId.eq(mess_id.to_string()))
            .order_by_asc(members::Column::NameNorm)
            .order_by_asc(members::Column::Id)
            .all(db)
            .await?;
        models.into_iter().map(Member::try_from).collect()
    }

    /// Remove a member together with their meals, bazar, deposits and
    /// expenses. Meal days left empty are removed as well.
    pub async fn delete_member(
        &self,
        mess_id: Uuid,
        member_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_member(&db_tx, mess_id, member_id).await?;
            let member_id = member_id.to_string();

            meal_entries::Entity::delete_many()
                .filter(meal_entries::Column::MemberId.eq(member_id.clone()))
                .exec(&db_tx)
                .await?;
            bazar::Entity::delete_many()
                .filter(bazar::Column::MemberId.eq(member_id.clone()))
                .exec(&db_tx)
                .await?;
            deposits::Entity::delete_many()
                .filter(deposits::Column::MemberId.eq(member_id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_many()
                .filter(expenses::Column::MemberId.eq(member_id.clone()))
                .exec(&db_tx)
                .await?;
            members::Entity::delete_by_id(member_id.clone())
                .exec(&db_tx)
                .await?;

            let backend = self.database.get_database_backend();
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM meal_days WHERE mess_id = ? AND id NOT IN (SELECT meal_day_id FROM meal_entries);",
                    vec![mess_id.to_string().into()],
                ))
                .await?;

            tracing::info!(%mess_id, %member_id, "member removed");
            Ok(())
        })
    }
}
