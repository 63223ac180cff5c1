use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Bazar, Dashboard, Deposit, Expense, MealRateReport, MonthLedger, MonthlyReport, ResultEngine,
    bazar, deposits, expenses,
};

use super::{Engine, with_tx};

impl Engine {
    async fn load_ledger(
        &self,
        db: &DatabaseTransaction,
        mess_id: Uuid,
        month_id: Uuid,
    ) -> ResultEngine<MonthLedger> {
        let members = self.members_by_name(db, mess_id).await?;
        let meal_days = self.meal_days_of_month(db, month_id).await?;

        let bazar = bazar::Entity::find()
            .filter(bazar::Column::MonthId.eq(month_id.to_string()))
            .all(db)
            .await?
            .into_iter()
            .map(Bazar::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let deposits = deposits::Entity::find()
            .filter(deposits::Column::MonthId.eq(month_id.to_string()))
            .all(db)
            .await?
            .into_iter()
            .map(Deposit::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let expenses = expenses::Entity::find()
            .filter(expenses::Column::MonthId.eq(month_id.to_string()))
            .all(db)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        tracing::debug!(
            %month_id,
            members = members.len(),
            meal_days = meal_days.len(),
            bazar = bazar.len(),
            deposits = deposits.len(),
            expenses = expenses.len(),
            "month ledger loaded"
        );
        Ok(MonthLedger {
            members,
            meal_days,
            bazar,
            deposits,
            expenses,
        })
    }

    /// Every record of a month, members ordered by name.
    pub async fn month_ledger(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<MonthLedger> {
        with_tx!(self, |db_tx| {
            self.require_mess(&db_tx, mess_id, user_id).await?;
            self.require_month(&db_tx, mess_id, month_id).await?;
            self.load_ledger(&db_tx, mess_id, month_id).await
        })
    }

    pub async fn meal_rate(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<MealRateReport> {
        let ledger = self.month_ledger(mess_id, month_id, user_id).await?;
        ledger.meal_rate(self.allocation_unit)
    }

    pub async fn monthly_report(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<MonthlyReport> {
        let ledger = self.month_ledger(mess_id, month_id, user_id).await?;
        ledger.monthly_report(self.allocation_unit)
    }

    pub async fn dashboard(
        &self,
        mess_id: Uuid,
        month_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Dashboard> {
        let ledger = self.month_ledger(mess_id, month_id, user_id).await?;
        ledger.dashboard(self.allocation_unit)
    }
}
