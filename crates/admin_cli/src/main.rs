use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Currency, Engine};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

mod prompt;
mod users;

#[derive(Parser, Debug)]
#[command(name = "messbook_admin")]
#[command(about = "Admin utilities for Messbook (bootstrap users, messes and months)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./messbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage API accounts.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Manage messes of an account.
    Mess {
        #[command(subcommand)]
        command: MessCommand,
    },
    /// Open accounting months.
    Month {
        #[command(subcommand)]
        command: MonthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create an account; the password is prompted twice.
    Create {
        #[arg(long)]
        username: String,
    },
}

#[derive(Subcommand, Debug)]
enum MessCommand {
    Create(MessCreateArgs),
    List {
        #[arg(long)]
        owner: String,
    },
}

#[derive(Args, Debug)]
struct MessCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "BDT", value_parser = parse_currency)]
    currency: Currency,
}

#[derive(Subcommand, Debug)]
enum MonthCommand {
    Create(MonthCreateArgs),
}

#[derive(Args, Debug)]
struct MonthCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    mess: Uuid,
    /// Month code, `YYYY-MM`.
    #[arg(long)]
    code: String,
    #[arg(long)]
    name: Option<String>,
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::try_from(raw).map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn require_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match users::Entity::find_by_id(username.to_string()).one(db).await? {
        Some(_) => Ok(()),
        None => Err(format!("user not found: {username}").into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User {
            command: UserCommand::Create { username },
        } => {
            if users::Entity::find_by_id(username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                return Err(format!("user already exists: {username}").into());
            }
            let password = prompt::new_password()?;

            users::Entity::insert(users::ActiveModel {
                username: Set(username.clone()),
                password: Set(password),
            })
            .exec(&db)
            .await?;
            println!("created user: {username}");
        }
        Command::Mess {
            command: MessCommand::Create(args),
        } => {
            require_user(&db, &args.owner).await?;
            let engine = Engine::builder().database(db.clone()).build().await?;
            let mess_id = engine
                .new_mess(&args.name, &args.owner, Some(args.currency))
                .await?;
            println!("created mess: {} ({mess_id})", args.name);
        }
        Command::Mess {
            command: MessCommand::List { owner },
        } => {
            require_user(&db, &owner).await?;
            let engine = Engine::builder().database(db.clone()).build().await?;
            for mess in engine.list_messes(&owner).await? {
                println!("{}\t{}\t{}", mess.id, mess.currency, mess.name);
            }
        }
        Command::Month {
            command: MonthCommand::Create(args),
        } => {
            require_user(&db, &args.owner).await?;
            let engine = Engine::builder().database(db.clone()).build().await?;
            let month_id = engine
                .new_month(args.mess, &args.code, args.name.as_deref(), &args.owner)
                .await?;
            println!("created month: {} ({month_id})", args.code);
        }
    }

    Ok(())
}
