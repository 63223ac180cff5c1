use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    BazarInput, Currency, DayMeals, DepositInput, Engine, EngineError, ExpenseInput, ExpenseKind,
    MealCount, MealEntry, Money,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn july(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
}

fn lunch_and_dinner(member_id: Uuid, lunch: u32, dinner: u32) -> MealEntry {
    MealEntry {
        member_id,
        meals: DayMeals::new(
            MealCount::ZERO,
            MealCount::whole(lunch),
            MealCount::whole(dinner),
        ),
    }
}

async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

struct Fixture {
    engine: Engine,
    db: DatabaseConnection,
    mess_id: Uuid,
    month_id: Uuid,
    members: Vec<Uuid>,
}

/// A mess with a July month and three members: Arif, Bashir, Chandan.
async fn fixture() -> Fixture {
    let (engine, db) = engine_with_db().await;
    let mess_id = engine.new_mess("Green House", "alice", None).await.unwrap();
    let month_id = engine
        .new_month(mess_id, "2025-07", None, "alice")
        .await
        .unwrap();
    let mut members = Vec::new();
    for name in ["Arif", "Bashir", "Chandan"] {
        members.push(engine.new_member(mess_id, name, "alice").await.unwrap());
    }
    Fixture {
        engine,
        db,
        mess_id,
        month_id,
        members,
    }
}

#[tokio::test]
async fn mess_is_visible_to_its_owner_only() {
    let (engine, _db) = engine_with_db().await;
    let mess_id = engine
        .new_mess("Green House", "alice", Some(Currency::Eur))
        .await
        .unwrap();

    let mess = engine.mess(mess_id, "alice").await.unwrap();
    assert_eq!(mess.name, "Green House");
    assert_eq!(mess.currency, Currency::Eur);

    assert_eq!(
        engine.mess(mess_id, "bob").await.unwrap_err(),
        EngineError::KeyNotFound("mess not exists".to_string())
    );
    assert!(engine.list_messes("bob").await.unwrap().is_empty());
    assert!(engine.new_member(mess_id, "Intruder", "bob").await.is_err());
}

#[tokio::test]
async fn mess_names_are_unique_per_owner() {
    let (engine, _db) = engine_with_db().await;
    engine.new_mess("Green House", "alice", None).await.unwrap();

    assert!(matches!(
        engine.new_mess("green house", "alice", None).await,
        Err(EngineError::ExistingKey(_))
    ));
    engine.new_mess("Green House", "bob", None).await.unwrap();
}

#[tokio::test]
async fn rename_mess_and_list_in_name_order() {
    let (engine, _db) = engine_with_db().await;
    let first = engine.new_mess("Zeta", "alice", None).await.unwrap();
    engine.new_mess("Beta", "alice", None).await.unwrap();

    engine.rename_mess(first, "Alpha", "alice").await.unwrap();
    let names: Vec<String> = engine
        .list_messes("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn months_are_validated_and_unique() {
    let f = fixture().await;

    assert!(matches!(
        f.engine.new_month(f.mess_id, "2025-13", None, "alice").await,
        Err(EngineError::InvalidDate(_))
    ));
    assert!(matches!(
        f.engine.new_month(f.mess_id, "2025-07", None, "alice").await,
        Err(EngineError::ExistingKey(_))
    ));

    f.engine
        .new_month(f.mess_id, "2025-06", Some("June"), "alice")
        .await
        .unwrap();
    let months = f.engine.list_months(f.mess_id, "alice").await.unwrap();
    let labels: Vec<(&str, &str)> = months
        .iter()
        .map(|m| (m.code.as_str(), m.name.as_str()))
        .collect();
    assert_eq!(labels, vec![("2025-06", "June"), ("2025-07", "July 2025")]);
}

#[tokio::test]
async fn member_names_ignore_case_and_spacing() {
    let f = fixture().await;

    assert!(matches!(
        f.engine.new_member(f.mess_id, "  arif ", "alice").await,
        Err(EngineError::ExistingKey(_))
    ));
    assert!(matches!(
        f.engine.new_member(f.mess_id, "   ", "alice").await,
        Err(EngineError::InvalidName(_))
    ));

    f.engine
        .rename_member(f.mess_id, f.members[0], "Zafar", "alice")
        .await
        .unwrap();
    let names: Vec<String> = f
        .engine
        .list_members(f.mess_id, "alice")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Bashir", "Chandan", "Zafar"]);
}

#[tokio::test]
async fn meal_day_is_recorded_once_per_date() {
    let f = fixture().await;
    let entries = vec![
        lunch_and_dinner(f.members[0], 1, 1),
        lunch_and_dinner(f.members[1], 1, 0),
        lunch_and_dinner(f.members[2], 0, 0),
    ];

    let day_id = f
        .engine
        .record_meal_day(f.mess_id, f.month_id, july(3), &entries, "alice")
        .await
        .unwrap();
    assert!(matches!(
        f.engine
            .record_meal_day(f.mess_id, f.month_id, july(3), &entries, "alice")
            .await,
        Err(EngineError::ExistingKey(_))
    ));

    let day = f.engine.meal_day(f.mess_id, day_id, "alice").await.unwrap();
    assert_eq!(day.date, july(3));
    // Members without meals are not stored.
    assert_eq!(day.entries.len(), 2);
    assert_eq!(day.total(), MealCount::whole(3));
}

#[tokio::test]
async fn meal_day_rejects_bad_input() {
    let f = fixture().await;
    let empty = vec![lunch_and_dinner(f.members[0], 0, 0)];
    assert!(matches!(
        f.engine
            .record_meal_day(f.mess_id, f.month_id, july(1), &empty, "alice")
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    let outside = vec![lunch_and_dinner(f.members[0], 1, 0)];
    assert!(matches!(
        f.engine
            .record_meal_day(
                f.mess_id,
                f.month_id,
                NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                &outside,
                "alice",
            )
            .await,
        Err(EngineError::InvalidDate(_))
    ));

    let stranger = vec![lunch_and_dinner(Uuid::new_v4(), 1, 0)];
    assert!(matches!(
        f.engine
            .record_meal_day(f.mess_id, f.month_id, july(1), &stranger, "alice")
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn update_meal_day_replaces_entries() {
    let f = fixture().await;
    let day_id = f
        .engine
        .record_meal_day(
            f.mess_id,
            f.month_id,
            july(2),
            &[lunch_and_dinner(f.members[0], 1, 1)],
            "alice",
        )
        .await
        .unwrap();

    f.engine
        .update_meal_day(
            f.mess_id,
            day_id,
            &[lunch_and_dinner(f.members[1], 1, 0)],
            "alice",
        )
        .await
        .unwrap();

    let days = f
        .engine
        .list_meal_days(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].entries.len(), 1);
    assert_eq!(days[0].entries[0].member_id, f.members[1]);

    f.engine
        .delete_meal_day(f.mess_id, day_id, "alice")
        .await
        .unwrap();
    assert!(
        f.engine
            .list_meal_days(f.mess_id, f.month_id, "alice")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn money_records_require_positive_amounts() {
    let f = fixture().await;
    let zero = DepositInput {
        date: july(1),
        member_id: f.members[0],
        amount: Money::ZERO,
    };
    assert!(matches!(
        f.engine
            .add_deposit(f.mess_id, f.month_id, zero, "alice")
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    let no_purpose = ExpenseInput {
        date: july(1),
        member_id: f.members[0],
        amount: Money::new(100_00),
        purpose: "  ".to_string(),
        kind: ExpenseKind::Shared,
    };
    assert!(matches!(
        f.engine
            .add_expense(f.mess_id, f.month_id, no_purpose, "alice")
            .await,
        Err(EngineError::InvalidName(_))
    ));
}

#[tokio::test]
async fn bazar_can_be_updated_and_deleted() {
    let f = fixture().await;
    let bazar_id = f
        .engine
        .add_bazar(
            f.mess_id,
            f.month_id,
            BazarInput {
                date: july(4),
                member_id: f.members[0],
                amount: Money::new(350_00),
                note: Some(" rice, lentils ".to_string()),
            },
            "alice",
        )
        .await
        .unwrap();

    f.engine
        .update_bazar(
            f.mess_id,
            bazar_id,
            BazarInput {
                date: july(5),
                member_id: f.members[1],
                amount: Money::new(400_00),
                note: None,
            },
            "alice",
        )
        .await
        .unwrap();

    let bazar = f
        .engine
        .list_bazar(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    assert_eq!(bazar.len(), 1);
    assert_eq!(bazar[0].member_id, f.members[1]);
    assert_eq!(bazar[0].amount, Money::new(400_00));
    assert_eq!(bazar[0].note, None);

    f.engine
        .delete_bazar(f.mess_id, bazar_id, "alice")
        .await
        .unwrap();
    assert_eq!(
        f.engine
            .delete_bazar(f.mess_id, bazar_id, "alice")
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("bazar not exists".to_string())
    );
}

#[tokio::test]
async fn monthly_report_from_recorded_month() {
    let f = fixture().await;
    let [arif, bashir, chandan] = [f.members[0], f.members[1], f.members[2]];

    f.engine
        .record_meal_day(
            f.mess_id,
            f.month_id,
            july(1),
            &[
                lunch_and_dinner(arif, 1, 1),
                lunch_and_dinner(bashir, 1, 1),
                lunch_and_dinner(chandan, 1, 1),
            ],
            "alice",
        )
        .await
        .unwrap();
    f.engine
        .add_bazar(
            f.mess_id,
            f.month_id,
            BazarInput {
                date: july(1),
                member_id: arif,
                amount: Money::new(700_00),
                note: None,
            },
            "alice",
        )
        .await
        .unwrap();
    f.engine
        .add_deposit(
            f.mess_id,
            f.month_id,
            DepositInput {
                date: july(2),
                member_id: bashir,
                amount: Money::new(500_00),
            },
            "alice",
        )
        .await
        .unwrap();
    f.engine
        .add_expense(
            f.mess_id,
            f.month_id,
            ExpenseInput {
                date: july(3),
                member_id: chandan,
                amount: Money::new(300_00),
                purpose: "Gas bill".to_string(),
                kind: ExpenseKind::Shared,
            },
            "alice",
        )
        .await
        .unwrap();

    let rate = f
        .engine
        .meal_rate(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    assert_eq!(rate.total_meals, MealCount::whole(6));
    assert_eq!(rate.distributed, Money::new(700_00));

    let report = f
        .engine
        .monthly_report(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    let balances: Vec<(String, i64)> = report
        .members
        .iter()
        .map(|m| (m.name.clone(), m.balance.minor()))
        .collect();
    // Meal cost 234/233/233 and 100 each of the gas bill.
    assert_eq!(
        balances,
        vec![
            ("Arif".to_string(), 700_00 - 234_00 - 100_00),
            ("Bashir".to_string(), 500_00 - 233_00 - 100_00),
            ("Chandan".to_string(), 300_00 - 233_00 - 100_00),
        ]
    );

    let dashboard = f
        .engine
        .dashboard(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    assert_eq!(dashboard.member_count, 3);
    assert_eq!(dashboard.total_deposit, Money::new(1_200_00));
}

#[tokio::test]
async fn delete_member_removes_their_records() {
    let f = fixture().await;
    let [arif, bashir, _] = [f.members[0], f.members[1], f.members[2]];

    f.engine
        .record_meal_day(
            f.mess_id,
            f.month_id,
            july(1),
            &[lunch_and_dinner(arif, 1, 0)],
            "alice",
        )
        .await
        .unwrap();
    f.engine
        .record_meal_day(
            f.mess_id,
            f.month_id,
            july(2),
            &[lunch_and_dinner(arif, 1, 0), lunch_and_dinner(bashir, 1, 0)],
            "alice",
        )
        .await
        .unwrap();
    f.engine
        .add_deposit(
            f.mess_id,
            f.month_id,
            DepositInput {
                date: july(1),
                member_id: arif,
                amount: Money::new(100_00),
            },
            "alice",
        )
        .await
        .unwrap();

    f.engine
        .delete_member(f.mess_id, arif, "alice")
        .await
        .unwrap();

    let ledger = f
        .engine
        .month_ledger(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    assert_eq!(ledger.members.len(), 2);
    assert!(ledger.deposits.is_empty());
    // July 1st only had Arif's meals, so the sheet is gone.
    assert_eq!(ledger.meal_days.len(), 1);
    assert_eq!(ledger.meal_days[0].date, july(2));
    assert_eq!(ledger.meal_days[0].entries.len(), 1);
}

#[tokio::test]
async fn delete_mess_cascades_everything() {
    let f = fixture().await;
    f.engine
        .record_meal_day(
            f.mess_id,
            f.month_id,
            july(1),
            &[lunch_and_dinner(f.members[0], 1, 1)],
            "alice",
        )
        .await
        .unwrap();

    assert!(f.engine.delete_mess(f.mess_id, "bob").await.is_err());
    f.engine.delete_mess(f.mess_id, "alice").await.unwrap();

    for table in ["messes", "months", "members", "meal_days", "meal_entries"] {
        assert_eq!(count_rows(&f.db, table).await, 0, "{table} not empty");
    }
}

#[tokio::test]
async fn allocation_unit_must_be_positive() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    assert!(matches!(
        Engine::builder().database(db).allocation_unit(0).build().await,
        Err(EngineError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn deposit_can_be_updated_and_deleted() {
    let f = fixture().await;
    let deposit_id = f
        .engine
        .add_deposit(
            f.mess_id,
            f.month_id,
            DepositInput {
                date: july(2),
                member_id: f.members[0],
                amount: Money::new(1_000_00),
            },
            "alice",
        )
        .await
        .unwrap();

    f.engine
        .update_deposit(
            f.mess_id,
            deposit_id,
            DepositInput {
                date: july(3),
                member_id: f.members[2],
                amount: Money::new(1_500_00),
            },
            "alice",
        )
        .await
        .unwrap();

    let deposits = f
        .engine
        .list_deposits(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    assert_eq!(deposits.len(), 1);
    assert_eq!(deposits[0].id, deposit_id);
    assert_eq!(deposits[0].date, july(3));
    assert_eq!(deposits[0].member_id, f.members[2]);
    assert_eq!(deposits[0].amount, Money::new(1_500_00));

    // Dates stay inside the deposit's month.
    assert!(matches!(
        f.engine
            .update_deposit(
                f.mess_id,
                deposit_id,
                DepositInput {
                    date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                    member_id: f.members[2],
                    amount: Money::new(1_500_00),
                },
                "alice",
            )
            .await,
        Err(EngineError::InvalidDate(_))
    ));

    assert!(f.engine.delete_deposit(f.mess_id, deposit_id, "bob").await.is_err());
    f.engine
        .delete_deposit(f.mess_id, deposit_id, "alice")
        .await
        .unwrap();
    assert!(
        f.engine
            .list_deposits(f.mess_id, f.month_id, "alice")
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        f.engine
            .delete_deposit(f.mess_id, deposit_id, "alice")
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("deposit not exists".to_string())
    );
}

#[tokio::test]
async fn expense_can_be_updated_and_deleted() {
    let f = fixture().await;
    let expense_id = f
        .engine
        .add_expense(
            f.mess_id,
            f.month_id,
            ExpenseInput {
                date: july(10),
                member_id: f.members[1],
                amount: Money::new(600_00),
                purpose: "gas bill".to_string(),
                kind: ExpenseKind::Shared,
            },
            "alice",
        )
        .await
        .unwrap();

    f.engine
        .update_expense(
            f.mess_id,
            expense_id,
            ExpenseInput {
                date: july(11),
                member_id: f.members[0],
                amount: Money::new(250_00),
                purpose: "  phone top-up ".to_string(),
                kind: ExpenseKind::Individual,
            },
            "alice",
        )
        .await
        .unwrap();

    let expenses = f
        .engine
        .list_expenses(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].member_id, f.members[0]);
    assert_eq!(expenses[0].amount, Money::new(250_00));
    assert_eq!(expenses[0].purpose, "phone top-up");
    assert_eq!(expenses[0].kind, ExpenseKind::Individual);

    assert!(matches!(
        f.engine
            .update_expense(
                f.mess_id,
                expense_id,
                ExpenseInput {
                    date: july(11),
                    member_id: f.members[0],
                    amount: Money::new(250_00),
                    purpose: "   ".to_string(),
                    kind: ExpenseKind::Individual,
                },
                "alice",
            )
            .await,
        Err(EngineError::InvalidName(_))
    ));

    f.engine
        .delete_expense(f.mess_id, expense_id, "alice")
        .await
        .unwrap();
    assert!(
        f.engine
            .list_expenses(f.mess_id, f.month_id, "alice")
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        f.engine
            .delete_expense(f.mess_id, expense_id, "alice")
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("expense not exists".to_string())
    );
}

#[tokio::test]
async fn delete_month_removes_only_its_records() {
    let f = fixture().await;
    let august = f
        .engine
        .new_month(f.mess_id, "2025-08", None, "alice")
        .await
        .unwrap();
    let august_first = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

    for (month_id, date) in [(f.month_id, july(1)), (august, august_first)] {
        f.engine
            .record_meal_day(
                f.mess_id,
                month_id,
                date,
                &[lunch_and_dinner(f.members[0], 1, 1)],
                "alice",
            )
            .await
            .unwrap();
        f.engine
            .add_bazar(
                f.mess_id,
                month_id,
                BazarInput {
                    date,
                    member_id: f.members[0],
                    amount: Money::new(300_00),
                    note: None,
                },
                "alice",
            )
            .await
            .unwrap();
        f.engine
            .add_deposit(
                f.mess_id,
                month_id,
                DepositInput {
                    date,
                    member_id: f.members[1],
                    amount: Money::new(500_00),
                },
                "alice",
            )
            .await
            .unwrap();
        f.engine
            .add_expense(
                f.mess_id,
                month_id,
                ExpenseInput {
                    date,
                    member_id: f.members[2],
                    amount: Money::new(90_00),
                    purpose: "internet".to_string(),
                    kind: ExpenseKind::Shared,
                },
                "alice",
            )
            .await
            .unwrap();
    }

    assert!(f.engine.delete_month(f.mess_id, f.month_id, "bob").await.is_err());
    f.engine
        .delete_month(f.mess_id, f.month_id, "alice")
        .await
        .unwrap();

    assert_eq!(
        f.engine
            .month_ledger(f.mess_id, f.month_id, "alice")
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("month not exists".to_string())
    );
    assert!(f.engine.list_bazar(f.mess_id, f.month_id, "alice").await.is_err());
    let months = f.engine.list_months(f.mess_id, "alice").await.unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].code, "2025-08");

    // Only August rows are left in every table.
    for table in ["meal_days", "meal_entries", "bazar", "deposits", "expenses"] {
        assert_eq!(count_rows(&f.db, table).await, 1, "{table}");
    }
    let ledger = f
        .engine
        .month_ledger(f.mess_id, august, "alice")
        .await
        .unwrap();
    assert_eq!(ledger.meal_days.len(), 1);
    assert_eq!(ledger.bazar.len(), 1);
    assert_eq!(ledger.deposits.len(), 1);
    assert_eq!(ledger.expenses.len(), 1);
    assert_eq!(ledger.members.len(), 3);
}

#[tokio::test]
async fn amounts_above_the_exact_limit_are_rejected() {
    let f = fixture().await;
    let too_much = Money::new(Money::MAX_EXACT.minor() + 1);

    assert!(matches!(
        f.engine
            .add_bazar(
                f.mess_id,
                f.month_id,
                BazarInput {
                    date: july(1),
                    member_id: f.members[0],
                    amount: too_much,
                    note: None,
                },
                "alice",
            )
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        f.engine
            .add_deposit(
                f.mess_id,
                f.month_id,
                DepositInput {
                    date: july(1),
                    member_id: f.members[0],
                    amount: too_much,
                },
                "alice",
            )
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    f.engine
        .add_deposit(
            f.mess_id,
            f.month_id,
            DepositInput {
                date: july(1),
                member_id: f.members[0],
                amount: Money::MAX_EXACT,
            },
            "alice",
        )
        .await
        .unwrap();
}
