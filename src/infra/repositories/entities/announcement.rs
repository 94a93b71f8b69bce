//! Announcement ("important info") entity.

use sea_orm::entity::prelude::*;

use crate::domain::Announcement;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub content: Option<String>,
    pub extension: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Announcement {
    fn from(model: Model) -> Self {
        Announcement {
            id: model.id,
            title: model.title,
            content: model.content,
            extension: model.extension,
        }
    }
}
