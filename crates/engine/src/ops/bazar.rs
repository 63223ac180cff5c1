use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Bazar, BazarInput, ResultEngine, bazar,
    util::{ensure_date_in_month, ensure_positive_amount, normalize_optional_text, parse_uuid},
};

use super::{Engine, with_tx};

impl Engine {
    /// Log a market purchase paid by a member.
    pub async fn add_bazar(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        input: BazarInput,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        ensure_positive_amount(input.amount, "bazar")?;
        let bazar_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let month = self.require_month(&db_tx, mess_id, month_id).await?;
            ensure_date_in_month(input.date, &month.code)?;
            self.require_member(&db_tx, mess_id, input.member_id).await?;

            bazar::ActiveModel {
                id: ActiveValue::Set(bazar_id.to_string()),
                mess_id: ActiveValue::Set(mess_id.to_string()),
                month_id: ActiveValue::Set(month_id.to_string()),
                date: ActiveValue::Set(input.date),
                member_id: ActiveValue::Set(input.member_id.to_string()),
                amount_minor: ActiveValue::Set(input.amount.minor()),
                note: ActiveValue::Set(normalize_optional_text(input.note.as_deref())),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%mess_id, %bazar_id, amount = %input.amount, "bazar added");
            Ok(bazar_id)
        })
    }

    /// Replace the values of a bazar entry. The month does not change.
    pub async fn update_bazar(
        &self,
        mess_id: Uuid,
        bazar_id: Uuid,
        input: BazarInput,
        user_id: &str,
    ) -> ResultEngine<()> {
        ensure_positive_amount(input.amount, "bazar")?;
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let model = self.require_bazar(&db_tx, mess_id, bazar_id).await?;
            let month_id = parse_uuid(&model.month_id, "month")?;
            let month = self.require_month(&db_tx, mess_id, month_id).await?;
            ensure_date_in_month(input.date, &month.code)?;
            self.require_member(&db_tx, mess_id, input.member_id).await?;

            let mut active: bazar::ActiveModel = model.into();
            active.date = ActiveValue::Set(input.date);
            active.member_id = ActiveValue::Set(input.member_id.to_string());
            active.amount_minor = ActiveValue::Set(input.amount.minor());
            active.note = ActiveValue::Set(normalize_optional_text(input.note.as_deref()));
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_bazar(&self, mess_id: Uuid, bazar_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_bazar(&db_tx, mess_id, bazar_id).await?;
            bazar::Entity::delete_by_id(bazar_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Bazar entries of a month, ordered by date.
    pub async fn list_bazar(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Bazar>> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_month(&db_tx, mess_id, month_id).await?;
            let models = bazar::Entity::find()
                .filter(bazar::Column::MonthId.eq(month_id.to_string()))
                .order_by_asc(bazar::Column::Date)
                .order_by_asc(bazar::Column::Id)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Bazar::try_from).collect()
        })
    }
}
