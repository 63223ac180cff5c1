//! Month reports: meal rate, member balances and the dashboard summary.
//!
//! Everything here is a pure function of a [`MonthLedger`], the records of
//! one month already loaded from the database. The engine loads the ledger
//! (see `Engine::month_ledger`) and calls into this module, so the arithmetic
//! can be tested without a database.
//!
//! Meal costs are distributed with [`allocate`] in whole *allocation units*
//! (`unit` minor units each; `100` means whole taka): the bazar total is
//! converted to units, rounded once, and split over the members' meal counts.
//! Shared expenses are split evenly in minor units.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    Bazar, Deposit, EngineError, Expense, ExpenseKind, MealCount, MealDay, Member, Money,
    Participant, ResultEngine, allocate, split_evenly,
};

/// Records of one month of one mess.
///
/// `members` order matters: it is the tie-break order of the allocation.
/// The engine loads members sorted by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonthLedger {
    pub members: Vec<Member>,
    pub meal_days: Vec<MealDay>,
    pub bazar: Vec<Bazar>,
    pub deposits: Vec<Deposit>,
    pub expenses: Vec<Expense>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberMealCost {
    pub member_id: Uuid,
    pub name: String,
    pub meals: MealCount,
    pub meal_cost: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MealRateReport {
    pub total_meals: MealCount,
    pub total_bazar: Money,
    /// Exact cost of one meal in major units (0 when nobody ate).
    pub rate_per_meal: f64,
    /// Sum of every member's meal cost.
    pub distributed: Money,
    pub members: Vec<MemberMealCost>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberBalance {
    pub member_id: Uuid,
    pub name: String,
    pub meals: MealCount,
    pub meal_cost: Money,
    /// Bazar this member paid for.
    pub bazar: Money,
    /// Cash deposits.
    pub deposit: Money,
    /// Shared expenses this member paid for.
    pub shared_paid: Money,
    /// `deposit + bazar + shared_paid`.
    pub credit: Money,
    pub shared_cost: Money,
    pub individual_cost: Money,
    /// `meal_cost + shared_cost + individual_cost`.
    pub total_cost: Money,
    /// `credit - total_cost`: positive when the mess owes the member.
    pub balance: Money,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportTotals {
    pub meals: MealCount,
    pub bazar: Money,
    pub deposit: Money,
    pub meal_cost: Money,
    pub shared_cost: Money,
    pub individual_cost: Money,
    pub credit: Money,
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyReport {
    pub rate_per_meal: f64,
    pub members: Vec<MemberBalance>,
    pub totals: ReportTotals,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSlice {
    pub member_id: Uuid,
    pub name: String,
    pub meals: MealCount,
    /// Deposits plus own bazar.
    pub deposit: Money,
    pub meal_cost: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dashboard {
    pub member_count: usize,
    pub total_meals: MealCount,
    pub total_bazar: Money,
    pub total_deposit: Money,
    pub rate_per_meal: f64,
    pub members: Vec<DashboardSlice>,
}

fn sum_by_member(items: impl Iterator<Item = (Uuid, Money)>) -> HashMap<Uuid, Money> {
    let mut totals: HashMap<Uuid, Money> = HashMap::new();
    for (member_id, amount) in items {
        *totals.entry(member_id).or_default() += amount;
    }
    totals
}

impl MonthLedger {
    /// Meals eaten by each member over the month.
    ///
    /// Entries of ids that are not in `members` are ignored.
    pub fn meals_by_member(&self) -> HashMap<Uuid, MealCount> {
        let mut meals: HashMap<Uuid, MealCount> =
            self.members.iter().map(|m| (m.id, MealCount::ZERO)).collect();
        for entry in self.meal_days.iter().flat_map(|day| day.entries.iter()) {
            if let Some(count) = meals.get_mut(&entry.member_id) {
                *count += entry.meals.total();
            }
        }
        meals
    }

    /// Reject a ledger whose amounts, taken together, exceed
    /// [`Money::MAX_EXACT`]. Every report figure is bounded by that sum.
    fn ensure_bounded(&self) -> ResultEngine<()> {
        let amounts = self
            .bazar
            .iter()
            .map(|b| b.amount)
            .chain(self.deposits.iter().map(|d| d.amount))
            .chain(self.expenses.iter().map(|e| e.amount));

        let mut total = Money::ZERO;
        for amount in amounts {
            let magnitude = Money::new(amount.minor().saturating_abs());
            total = total
                .checked_add(magnitude)
                .filter(|sum| *sum <= Money::MAX_EXACT)
                .ok_or_else(|| {
                    EngineError::InvalidAmount(format!(
                        "month total exceeds {}",
                        Money::MAX_EXACT
                    ))
                })?;
        }
        Ok(())
    }

    pub fn total_bazar(&self) -> Money {
        self.bazar.iter().map(|b| b.amount).sum()
    }

    pub fn total_deposits(&self) -> Money {
        self.deposits.iter().map(|d| d.amount).sum()
    }

    fn total_meals(meals: &HashMap<Uuid, MealCount>) -> MealCount {
        meals.values().copied().sum()
    }

    fn rate_per_meal(total_bazar: Money, total_meals: MealCount) -> f64 {
        if total_meals.is_zero() {
            return 0.0;
        }
        total_bazar.as_major() / total_meals.as_f64()
    }

    /// Meal cost of every member, in minor units.
    fn meal_costs(
        &self,
        meals: &HashMap<Uuid, MealCount>,
        unit: i64,
    ) -> ResultEngine<HashMap<Uuid, Money>> {
        let participants: Vec<Participant<Uuid>> = self
            .members
            .iter()
            .map(|m| {
                let count = meals.get(&m.id).copied().unwrap_or_default();
                Participant::new(m.id, count.as_f64())
            })
            .collect();
        let total_units = self.total_bazar().minor() as f64 / unit as f64;
        tracing::debug!(
            members = participants.len(),
            total_units,
            "distributing meal cost"
        );

        let allocation = allocate(total_units, &participants)?;
        Ok(allocation
            .into_iter()
            .map(|(id, units)| (id, Money::new(units * unit)))
            .collect())
    }

    /// Meal rate and per-member meal cost.
    pub fn meal_rate(&self, unit: i64) -> ResultEngine<MealRateReport> {
        self.ensure_bounded()?;
        let meals = self.meals_by_member();
        let costs = self.meal_costs(&meals, unit)?;
        let total_meals = Self::total_meals(&meals);
        let total_bazar = self.total_bazar();

        let members: Vec<MemberMealCost> = self
            .members
            .iter()
            .map(|m| MemberMealCost {
                member_id: m.id,
                name: m.name.clone(),
                meals: meals.get(&m.id).copied().unwrap_or_default(),
                meal_cost: costs.get(&m.id).copied().unwrap_or_default(),
            })
            .collect();

        Ok(MealRateReport {
            total_meals,
            total_bazar,
            rate_per_meal: Self::rate_per_meal(total_bazar, total_meals),
            distributed: members.iter().map(|m| m.meal_cost).sum(),
            members,
        })
    }

    /// Full balance sheet of the month.
    pub fn monthly_report(&self, unit: i64) -> ResultEngine<MonthlyReport> {
        self.ensure_bounded()?;
        let meals = self.meals_by_member();
        let meal_costs = self.meal_costs(&meals, unit)?;

        let bazar = sum_by_member(self.bazar.iter().map(|b| (b.member_id, b.amount)));
        let deposits = sum_by_member(self.deposits.iter().map(|d| (d.member_id, d.amount)));
        let shared_paid = sum_by_member(
            self.expenses
                .iter()
                .filter(|e| e.kind == ExpenseKind::Shared)
                .map(|e| (e.member_id, e.amount)),
        );
        let individual = sum_by_member(
            self.expenses
                .iter()
                .filter(|e| e.kind == ExpenseKind::Individual)
                .map(|e| (e.member_id, e.amount)),
        );

        let total_shared: Money = shared_paid.values().sum();
        let shared_split = split_evenly(total_shared.minor(), self.members.iter().map(|m| m.id))?;

        let get = |map: &HashMap<Uuid, Money>, id: &Uuid| map.get(id).copied().unwrap_or_default();

        let mut totals = ReportTotals::default();
        let mut members = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let meal_cost = get(&meal_costs, &member.id);
            let bazar = get(&bazar, &member.id);
            let deposit = get(&deposits, &member.id);
            let shared_paid = get(&shared_paid, &member.id);
            let shared_cost = Money::new(shared_split.get(&member.id).unwrap_or_default());
            let individual_cost = get(&individual, &member.id);

            let credit = deposit + bazar + shared_paid;
            let total_cost = meal_cost + shared_cost + individual_cost;
            let row = MemberBalance {
                member_id: member.id,
                name: member.name.clone(),
                meals: meals.get(&member.id).copied().unwrap_or_default(),
                meal_cost,
                bazar,
                deposit,
                shared_paid,
                credit,
                shared_cost,
                individual_cost,
                total_cost,
                balance: credit - total_cost,
            };

            totals.meals += row.meals;
            totals.bazar += row.bazar;
            totals.deposit += row.deposit;
            totals.meal_cost += row.meal_cost;
            totals.shared_cost += row.shared_cost;
            totals.individual_cost += row.individual_cost;
            totals.credit += row.credit;
            totals.balance += row.balance;
            members.push(row);
        }

        Ok(MonthlyReport {
            rate_per_meal: Self::rate_per_meal(self.total_bazar(), totals.meals),
            members,
            totals,
        })
    }

    /// Month summary: totals and per-member slices.
    pub fn dashboard(&self, unit: i64) -> ResultEngine<Dashboard> {
        self.ensure_bounded()?;
        let meals = self.meals_by_member();
        let meal_costs = self.meal_costs(&meals, unit)?;
        let bazar = sum_by_member(self.bazar.iter().map(|b| (b.member_id, b.amount)));
        let deposits = sum_by_member(self.deposits.iter().map(|d| (d.member_id, d.amount)));

        let members: Vec<DashboardSlice> = self
            .members
            .iter()
            .map(|m| DashboardSlice {
                member_id: m.id,
                name: m.name.clone(),
                meals: meals.get(&m.id).copied().unwrap_or_default(),
                deposit: deposits.get(&m.id).copied().unwrap_or_default()
                    + bazar.get(&m.id).copied().unwrap_or_default(),
                meal_cost: meal_costs.get(&m.id).copied().unwrap_or_default(),
            })
            .collect();

        let total_meals = Self::total_meals(&meals);
        let total_bazar = self.total_bazar();
        Ok(Dashboard {
            member_count: self.members.len(),
            total_meals,
            total_bazar,
            total_deposit: members.iter().map(|m| m.deposit).sum(),
            rate_per_meal: Self::rate_per_meal(total_bazar, total_meals),
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{DayMeals, meal_days::MealEntry};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn member(name: &str) -> Member {
        Member {
            id: Uuid::new_v4(),
            mess_id: Uuid::nil(),
            name: name.to_string(),
        }
    }

    fn meals(member: &Member, breakfast: u32, lunch: u32, dinner: u32) -> MealEntry {
        MealEntry {
            member_id: member.id,
            meals: DayMeals::new(
                MealCount::whole(breakfast),
                MealCount::whole(lunch),
                MealCount::whole(dinner),
            ),
        }
    }

    fn day(day_of_month: u32, entries: Vec<MealEntry>) -> MealDay {
        MealDay {
            id: Uuid::new_v4(),
            month_id: Uuid::nil(),
            date: date(day_of_month),
            entries,
        }
    }

    fn bazar(member: &Member, minor: i64) -> Bazar {
        Bazar {
            id: Uuid::new_v4(),
            month_id: Uuid::nil(),
            date: date(1),
            member_id: member.id,
            amount: Money::new(minor),
            note: None,
        }
    }

    fn deposit(member: &Member, minor: i64) -> Deposit {
        Deposit {
            id: Uuid::new_v4(),
            month_id: Uuid::nil(),
            date: date(1),
            member_id: member.id,
            amount: Money::new(minor),
        }
    }

    fn expense(member: &Member, minor: i64, kind: ExpenseKind) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            month_id: Uuid::nil(),
            date: date(2),
            member_id: member.id,
            amount: Money::new(minor),
            purpose: "rent".to_string(),
            kind,
        }
    }

    /// Three members, one meal each, 700 taka of bazar paid by the first.
    fn three_members() -> (MonthLedger, Vec<Member>) {
        let members = vec![member("Arif"), member("Bashir"), member("Chandan")];
        let ledger = MonthLedger {
            meal_days: vec![day(
                1,
                vec![
                    meals(&members[0], 0, 1, 0),
                    meals(&members[1], 0, 1, 0),
                    meals(&members[2], 0, 1, 0),
                ],
            )],
            bazar: vec![bazar(&members[0], 700_00)],
            members: members.clone(),
            ..Default::default()
        };
        (ledger, members)
    }

    #[test]
    fn meal_cost_adds_up_to_the_bazar_total() {
        let (ledger, _) = three_members();
        let report = ledger.meal_rate(100).unwrap();

        assert_eq!(report.total_meals, MealCount::whole(3));
        assert_eq!(report.total_bazar, Money::new(700_00));
        assert!((report.rate_per_meal - 233.333_333).abs() < 1e-3);
        assert_eq!(report.distributed, Money::new(700_00));
        let costs: Vec<i64> = report.members.iter().map(|m| m.meal_cost.minor()).collect();
        assert_eq!(costs, vec![234_00, 233_00, 233_00]);
    }

    #[test]
    fn no_meals_means_no_meal_cost() {
        let members = vec![member("Arif"), member("Bashir")];
        let ledger = MonthLedger {
            bazar: vec![bazar(&members[0], 500_00)],
            members,
            ..Default::default()
        };
        let report = ledger.meal_rate(100).unwrap();

        assert_eq!(report.rate_per_meal, 0.0);
        assert_eq!(report.distributed, Money::ZERO);
        assert!(report.members.iter().all(|m| m.meal_cost.is_zero()));
    }

    #[test]
    fn bazar_total_is_rounded_to_the_allocation_unit() {
        let (mut ledger, members) = three_members();
        ledger.bazar = vec![bazar(&members[1], 100_40)];
        let report = ledger.meal_rate(100).unwrap();

        // 100.40 taka rounds to 100 whole taka.
        assert_eq!(report.distributed, Money::new(100_00));

        let report = ledger.meal_rate(1).unwrap();
        assert_eq!(report.distributed, Money::new(100_40));
    }

    #[test]
    fn meals_of_unknown_members_are_ignored() {
        let (mut ledger, _) = three_members();
        let stranger = member("Stranger");
        ledger.meal_days.push(day(2, vec![meals(&stranger, 1, 1, 1)]));

        assert_eq!(ledger.meal_rate(100).unwrap().total_meals, MealCount::whole(3));
    }

    #[test]
    fn monthly_report_balances_credit_against_cost() {
        let (mut ledger, members) = three_members();
        ledger.deposits = vec![deposit(&members[1], 300_00), deposit(&members[2], 100_00)];
        ledger.expenses = vec![
            expense(&members[2], 300_00, ExpenseKind::Shared),
            expense(&members[0], 50_00, ExpenseKind::Individual),
        ];

        let report = ledger.monthly_report(100).unwrap();
        let arif = &report.members[0];
        let bashir = &report.members[1];
        let chandan = &report.members[2];

        assert_eq!(arif.credit, Money::new(700_00));
        assert_eq!(arif.meal_cost, Money::new(234_00));
        assert_eq!(arif.shared_cost, Money::new(100_00));
        assert_eq!(arif.individual_cost, Money::new(50_00));
        assert_eq!(arif.total_cost, Money::new(384_00));
        assert_eq!(arif.balance, Money::new(316_00));

        assert_eq!(bashir.credit, Money::new(300_00));
        assert_eq!(bashir.balance, Money::new(300_00 - 233_00 - 100_00));

        assert_eq!(chandan.shared_paid, Money::new(300_00));
        assert_eq!(chandan.credit, Money::new(400_00));
        assert_eq!(chandan.balance, Money::new(400_00 - 233_00 - 100_00));

        assert_eq!(report.totals.meal_cost, Money::new(700_00));
        assert_eq!(report.totals.shared_cost, Money::new(300_00));
        // Money in minus money spent on individual items.
        assert_eq!(
            report.totals.balance,
            report.totals.credit - report.totals.meal_cost - report.totals.shared_cost
                - report.totals.individual_cost
        );
    }

    #[test]
    fn shared_expenses_split_to_the_minor_unit() {
        let (mut ledger, members) = three_members();
        ledger.bazar.clear();
        ledger.expenses = vec![expense(&members[0], 100_00, ExpenseKind::Shared)];

        let report = ledger.monthly_report(100).unwrap();
        let shares: Vec<i64> = report
            .members
            .iter()
            .map(|m| m.shared_cost.minor())
            .collect();
        assert_eq!(shares, vec![33_34, 33_33, 33_33]);
        assert_eq!(report.totals.shared_cost, Money::new(100_00));
    }

    #[test]
    fn dashboard_counts_bazar_as_deposit() {
        let (mut ledger, members) = three_members();
        ledger.deposits = vec![deposit(&members[0], 200_00)];

        let dashboard = ledger.dashboard(100).unwrap();
        assert_eq!(dashboard.member_count, 3);
        assert_eq!(dashboard.total_bazar, Money::new(700_00));
        assert_eq!(dashboard.total_deposit, Money::new(900_00));
        assert_eq!(dashboard.members[0].deposit, Money::new(900_00));
        assert_eq!(dashboard.members[0].meal_cost, Money::new(234_00));
    }

    #[test]
    fn empty_month_produces_empty_report() {
        let report = MonthLedger::default().monthly_report(100).unwrap();
        assert!(report.members.is_empty());
        assert_eq!(report.totals, ReportTotals::default());
    }

    #[test]
    fn oversized_month_totals_are_rejected() {
        let (mut ledger, members) = three_members();
        ledger.bazar = vec![
            bazar(&members[0], i64::MAX / 2 + 1),
            bazar(&members[1], i64::MAX / 2 + 1),
        ];

        for result in [
            ledger.monthly_report(100).map(|_| ()),
            ledger.meal_rate(100).map(|_| ()),
            ledger.dashboard(100).map(|_| ()),
        ] {
            assert!(matches!(result, Err(EngineError::InvalidAmount(_))));
        }
    }

    #[test]
    fn month_total_at_the_exact_limit_is_reported() {
        let (mut ledger, members) = three_members();
        ledger.bazar = vec![bazar(&members[0], Money::MAX_EXACT.minor())];

        let report = ledger.meal_rate(1).unwrap();
        assert_eq!(report.distributed, Money::MAX_EXACT);
    }
}
