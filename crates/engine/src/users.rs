//! Users table (minimal entity).
//!
//! Messes are owned by a `user_id`, which is the username.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::messes::Entity")]
    Messes,
}

impl Related<super::messes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
