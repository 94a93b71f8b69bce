//! Personnel entity.

use sea_orm::entity::prelude::*;

use crate::domain::Personnel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "personnel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub in_carousel: bool,
    pub birth_date: Option<Date>,
    pub position_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Personnel {
    fn from(model: Model) -> Self {
        Personnel {
            id: model.id,
            name: model.name,
            email: model.email,
            description: model.description,
            photo_url: model.photo_url,
            in_carousel: model.in_carousel,
            birth_date: model.birth_date,
            position_id: model.position_id,
        }
    }
}
