use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Deposit, DepositInput, ResultEngine, deposits,
    util::{ensure_date_in_month, ensure_positive_amount, parse_uuid},
};

use super::{Engine, with_tx};

impl Engine {
    /// Log cash a member handed to the mess.
    pub async fn add_deposit(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        input: DepositInput,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        ensure_positive_amount(input.amount, "deposit")?;
        let deposit_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let month = self.require_month(&db_tx, mess_id, month_id).await?;
            ensure_date_in_month(input.date, &month.code)?;
            self.require_member(&db_tx, mess_id, input.member_id).await?;

            deposits::ActiveModel {
                id: ActiveValue::Set(deposit_id.to_string()),
                mess_id: ActiveValue::Set(mess_id.to_string()),
                month_id: ActiveValue::Set(month_id.to_string()),
                date: ActiveValue::Set(input.date),
                member_id: ActiveValue::Set(input.member_id.to_string()),
                amount_minor: ActiveValue::Set(input.amount.minor()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%mess_id, %deposit_id, amount = %input.amount, "deposit added");
            Ok(deposit_id)
        })
    }

    pub async fn update_deposit(
        &self,
        mess_id: Uuid,
        deposit_id: Uuid,
        input: DepositInput,
        user_id: &str,
    ) -> ResultEngine<()> {
        ensure_positive_amount(input.amount, "deposit")?;
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let model = self.require_deposit(&db_tx, mess_id, deposit_id).await?;
            let month_id = parse_uuid(&model.month_id, "month")?;
            let month = self.require_month(&db_tx, mess_id, month_id).await?;
            ensure_date_in_month(input.date, &month.code)?;
            self.require_member(&db_tx, mess_id, input.member_id).await?;

            let mut active: deposits::ActiveModel = model.into();
            active.date = ActiveValue::Set(input.date);
            active.member_id = ActiveValue::Set(input.member_id.to_string());
            active.amount_minor = ActiveValue::Set(input.amount.minor());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_deposit(
        &self,
        mess_id: Uuid,
        deposit_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_deposit(&db_tx, mess_id, deposit_id).await?;
            deposits::Entity::delete_by_id(deposit_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub async fn list_deposits(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Deposit>> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_month(&db_tx, mess_id, month_id).await?;
            let models = deposits::Entity::find()
                .filter(deposits::Column::MonthId.eq(month_id.to_string()))
                .order_by_asc(deposits::Column::Date)
                .order_by_asc(deposits::Column::Id)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Deposit::try_from).collect()
        })
    }
}
