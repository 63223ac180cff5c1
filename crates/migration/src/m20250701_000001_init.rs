//! Initial schema:
//!
//! - `users`: identities checked by the HTTP API
//! - `messes`: households owned by a user
//! - `months`: accounting months of a mess
//! - `members`: people eating in a mess
//! - `meal_days` / `meal_entries`: daily meal sheets, one row per member
//! - `bazar`, `deposits`, `expenses`: money records of a month

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Messes {
    Table,
    Id,
    Name,
    UserId,
    Currency,
}

#[derive(Iden)]
enum Months {
    Table,
    Id,
    MessId,
    Code,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
    MessId,
    Name,
    NameNorm,
}

#[derive(Iden)]
enum MealDays {
    Table,
    Id,
    MessId,
    MonthId,
    Date,
}

#[derive(Iden)]
enum MealEntries {
    Table,
    MealDayId,
    MemberId,
    BreakfastHalves,
    LunchHalves,
    DinnerHalves,
}

#[derive(Iden)]
enum Bazar {
    Table,
    Id,
    MessId,
    MonthId,
    Date,
    MemberId,
    AmountMinor,
    Note,
}

#[derive(Iden)]
enum Deposits {
    Table,
    Id,
    MessId,
    MonthId,
    Date,
    MemberId,
    AmountMinor,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    MessId,
    MonthId,
    Date,
    MemberId,
    AmountMinor,
    Purpose,
    Kind,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Messes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Messes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Messes::Name).string().not_null())
                    .col(ColumnDef::new(Messes::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Messes::Currency)
                            .string()
                            .not_null()
                            .default("BDT"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-messes-user_id")
                            .from(Messes::Table, Messes::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Months
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Months::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Months::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Months::MessId).string().not_null())
                    .col(ColumnDef::new(Months::Code).string().not_null())
                    .col(ColumnDef::new(Months::Name).string().not_null())
                    .col(
                        ColumnDef::new(Months::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-months-mess_id")
                            .from(Months::Table, Months::MessId)
                            .to(Messes::Table, Messes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-months-mess_id-code-unique")
                    .table(Months::Table)
                    .col(Months::MessId)
                    .col(Months::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Members::MessId).string().not_null())
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::NameNorm).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-members-mess_id")
                            .from(Members::Table, Members::MessId)
                            .to(Messes::Table, Messes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-members-mess_id-name_norm-unique")
                    .table(Members::Table)
                    .col(Members::MessId)
                    .col(Members::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Meal days and entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MealDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MealDays::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MealDays::MessId).string().not_null())
                    .col(ColumnDef::new(MealDays::MonthId).string().not_null())
                    .col(ColumnDef::new(MealDays::Date).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-meal_days-mess_id")
                            .from(MealDays::Table, MealDays::MessId)
                            .to(Messes::Table, Messes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-meal_days-month_id")
                            .from(MealDays::Table, MealDays::MonthId)
                            .to(Months::Table, Months::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-meal_days-month_id-date-unique")
                    .table(MealDays::Table)
                    .col(MealDays::MonthId)
                    .col(MealDays::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MealEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MealEntries::MealDayId).string().not_null())
                    .col(ColumnDef::new(MealEntries::MemberId).string().not_null())
                    .col(
                        ColumnDef::new(MealEntries::BreakfastHalves)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MealEntries::LunchHalves)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MealEntries::DinnerHalves)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(MealEntries::MealDayId)
                            .col(MealEntries::MemberId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-meal_entries-meal_day_id")
                            .from(MealEntries::Table, MealEntries::MealDayId)
                            .to(MealDays::Table, MealDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-meal_entries-member_id")
                            .from(MealEntries::Table, MealEntries::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Bazar, deposits, expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bazar::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bazar::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Bazar::MessId).string().not_null())
                    .col(ColumnDef::new(Bazar::MonthId).string().not_null())
                    .col(ColumnDef::new(Bazar::Date).date().not_null())
                    .col(ColumnDef::new(Bazar::MemberId).string().not_null())
                    .col(ColumnDef::new(Bazar::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Bazar::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bazar-mess_id")
                            .from(Bazar::Table, Bazar::MessId)
                            .to(Messes::Table, Messes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bazar-month_id")
                            .from(Bazar::Table, Bazar::MonthId)
                            .to(Months::Table, Months::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bazar-member_id")
                            .from(Bazar::Table, Bazar::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bazar-month_id")
                    .table(Bazar::Table)
                    .col(Bazar::MonthId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Deposits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deposits::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Deposits::MessId).string().not_null())
                    .col(ColumnDef::new(Deposits::MonthId).string().not_null())
                    .col(ColumnDef::new(Deposits::Date).date().not_null())
                    .col(ColumnDef::new(Deposits::MemberId).string().not_null())
                    .col(ColumnDef::new(Deposits::AmountMinor).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposits-mess_id")
                            .from(Deposits::Table, Deposits::MessId)
                            .to(Messes::Table, Messes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposits-month_id")
                            .from(Deposits::Table, Deposits::MonthId)
                            .to(Months::Table, Months::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposits-member_id")
                            .from(Deposits::Table, Deposits::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deposits-month_id")
                    .table(Deposits::Table)
                    .col(Deposits::MonthId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::MessId).string().not_null())
                    .col(ColumnDef::new(Expenses::MonthId).string().not_null())
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::MemberId).string().not_null())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Purpose).string().not_null())
                    .col(ColumnDef::new(Expenses::Kind).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-mess_id")
                            .from(Expenses::Table, Expenses::MessId)
                            .to(Messes::Table, Messes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-month_id")
                            .from(Expenses::Table, Expenses::MonthId)
                            .to(Months::Table, Months::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-member_id")
                            .from(Expenses::Table, Expenses::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-month_id")
                    .table(Expenses::Table)
                    .col(Expenses::MonthId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deposits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bazar::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MealEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MealDays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Months::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
