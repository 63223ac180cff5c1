use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseInput, ResultEngine, expenses,
    util::{ensure_date_in_month, ensure_positive_amount, normalize_optional_text, parse_uuid},
};

use super::{Engine, with_tx};

fn required_purpose(purpose: &str) -> ResultEngine<String> {
    normalize_optional_text(Some(purpose))
        .ok_or_else(|| EngineError::InvalidName("expense purpose must not be empty".to_string()))
}

impl Engine {
    /// Log a non-food expense.
    ///
    /// A shared expense is split among every member of the mess; an
    /// individual one is charged to the payer.
    pub async fn add_expense(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        input: ExpenseInput,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        ensure_positive_amount(input.amount, "expense")?;
        let purpose = required_purpose(&input.purpose)?;
        let expense_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let month = self.require_month(&db_tx, mess_id, month_id).await?;
            ensure_date_in_month(input.date, &month.code)?;
            self.require_member(&db_tx, mess_id, input.member_id).await?;

            expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                mess_id: ActiveValue::Set(mess_id.to_string()),
                month_id: ActiveValue::Set(month_id.to_string()),
                date: ActiveValue::Set(input.date),
                member_id: ActiveValue::Set(input.member_id.to_string()),
                amount_minor: ActiveValue::Set(input.amount.minor()),
                purpose: ActiveValue::Set(purpose),
                kind: ActiveValue::Set(input.kind.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(
                %mess_id,
                %expense_id,
                kind = input.kind.as_str(),
                amount = %input.amount,
                "expense added"
            );
            Ok(expense_id)
        })
    }

    pub async fn update_expense(
        &self,
        mess_id: Uuid,
        expense_id: Uuid,
        input: ExpenseInput,
        user_id: &str,
    ) -> ResultEngine<()> {
        ensure_positive_amount(input.amount, "expense")?;
        let purpose = required_purpose(&input.purpose)?;
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            let model = self.require_expense(&db_tx, mess_id, expense_id).await?;
            let month_id = parse_uuid(&model.month_id, "month")?;
            let month = self.require_month(&db_tx, mess_id, month_id).await?;
            ensure_date_in_month(input.date, &month.code)?;
            self.require_member(&db_tx, mess_id, input.member_id).await?;

            let mut active: expenses::ActiveModel = model.into();
            active.date = ActiveValue::Set(input.date);
            active.member_id = ActiveValue::Set(input.member_id.to_string());
            active.amount_minor = ActiveValue::Set(input.amount.minor());
            active.purpose = ActiveValue::Set(purpose);
            active.kind = ActiveValue::Set(input.kind.as_str().to_string());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_expense(
        &self,
        mess_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_expense(&db_tx, mess_id, expense_id).await?;
            expenses::Entity::delete_by_id(expense_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Expenses of a month, ordered by date.
    pub async fn list_expenses(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_month(&db_tx, mess_id, month_id).await?;
            let models = expenses::Entity::find()
                .filter(expenses::Column::MonthId.eq(month_id.to_string()))
                .order_by_asc(expenses::Column::Date)
                .order_by_asc(expenses::Column::Id)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Expense::try_from).collect()
        })
    }
}
