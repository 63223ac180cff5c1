use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod bazar;
mod deposits;
mod expenses;
mod meals;
mod members;
mod messes;
mod months;
mod reports;

/// Minor units per allocated unit when the builder is not told otherwise:
/// meal costs are distributed in whole taka.
pub const DEFAULT_ALLOCATION_UNIT: i64 = 100;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Minor units per unit handed out by the meal cost allocation.
    allocation_unit: i64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn allocation_unit(&self) -> i64 {
        self.allocation_unit
    }
}

/// The builder for `Engine`
#[derive(Debug)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    allocation_unit: i64,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            allocation_unit: DEFAULT_ALLOCATION_UNIT,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Minor units per allocated unit (`100` distributes whole taka, `1`
    /// distributes paisa).
    pub fn allocation_unit(mut self, unit: i64) -> EngineBuilder {
        self.allocation_unit = unit;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.allocation_unit <= 0 {
            return Err(EngineError::InvalidArgument(format!(
                "allocation unit must be > 0, got {}",
                self.allocation_unit
            )));
        }
        Ok(Engine {
            database: self.database,
            allocation_unit: self.allocation_unit,
        })
    }
}
