//! Position ("puesto") entity.

use sea_orm::entity::prelude::*;

use crate::domain::Position;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "positions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub department_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Position {
    fn from(model: Model) -> Self {
        Position {
            id: model.id,
            name: model.name,
            department_id: model.department_id,
        }
    }
}
