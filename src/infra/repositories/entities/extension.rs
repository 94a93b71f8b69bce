//! Extension entity.

use sea_orm::entity::prelude::*;

use crate::domain::Extension;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "extensions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: String,
    pub department_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Extension {
    fn from(model: Model) -> Self {
        Extension {
            id: model.id,
            number: model.number,
            department_id: model.department_id,
        }
    }
}
