//! The `Mess` is a shared household. It owns months, members and every
//! record logged in them. A user can run several messes.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    Currency, EngineError,
    util::{model_currency, parse_uuid},
};

/// A shared household.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mess {
    pub id: Uuid,
    pub name: String,
    /// Owner (username).
    pub user_id: String,
    pub currency: Currency,
}

impl Mess {
    pub fn new(name: String, user_id: &str, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            user_id: user_id.to_string(),
            currency,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::months::Entity")]
    Months,
    #[sea_orm(has_many = "super::members::Entity")]
    Members,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::months::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Months.def()
    }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Mess> for ActiveModel {
    fn from(value: &Mess) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
        }
    }
}

impl TryFrom<Model> for Mess {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "mess")?,
            name: model.name,
            user_id: model.user_id,
            currency: model_currency(&model.currency)?,
        })
    }
}
