//! Mess members: the participants of every split.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub mess_id: String,
    pub name: String,
    /// Case/width-insensitive key, unique per mess.
    pub name_norm: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::messes::Entity",
        from = "Column::MessId",
        to = "super::messes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Mess,
}

impl Related<super::messes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mess.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Member {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "member")?,
            mess_id: parse_uuid(&model.mess_id, "mess")?,
            name: model.name,
        })
    }
}
