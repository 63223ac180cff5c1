use std::collections::HashSet;

use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, bazar, deposits, expenses, meal_days, members, messes, months,
};

use super::Engine;

/// Generates a `require_*` method returning the model of a target entity
/// that belongs to the given mess.
macro_rules! impl_target_in_mess {
    ($require_fn:ident, $entity:ident, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            mess_id: Uuid,
            target_id: Uuid,
        ) -> ResultEngine<$entity::Model> {
            $entity::Entity::find_by_id(target_id.to_string())
                .filter($entity::Column::MessId.eq(mess_id.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_target_in_mess!(require_month, months, "month not exists");
    impl_target_in_mess!(require_member, members, "member not exists");
    impl_target_in_mess!(require_meal_day, meal_days, "meal day not exists");
    impl_target_in_mess!(require_bazar, bazar, "bazar not exists");
    impl_target_in_mess!(require_deposit, deposits, "deposit not exists");
    impl_target_in_mess!(require_expense, expenses, "expense not exists");

    /// Return the mess if `user_id` owns it.
    ///
    /// A mess owned by somebody else is reported as missing.
    pub(super) async fn require_mess(
        &self,
        db: &DatabaseTransaction,
        mess_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<messes::Model> {
        let model = messes::Entity::find_by_id(mess_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("mess not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("mess not exists".to_string()));
        }
        Ok(model)
    }

    /// Ensure every id is a member of the mess.
    pub(super) async fn require_members(
        &self,
        db: &DatabaseTransaction,
        mess_id: Uuid,
        member_ids: impl IntoIterator<Item = Uuid>,
    ) -> ResultEngine<()> {
        let wanted: HashSet<String> = member_ids.into_iter().map(|id| id.to_string()).collect();
        if wanted.is_empty() {
            return Ok(());
        }
        let found = members::Entity::find()
            .filter(members::Column::MessId.eq(mess_id.to_string()))
            .filter(members::Column::Id.is_in(wanted.iter().cloned()))
            .count(db)
            .await?;
        if found != wanted.len() as u64 {
            return Err(EngineError::KeyNotFound("member not exists".to_string()));
        }
        Ok(())
    }
}
