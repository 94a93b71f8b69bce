//! Join between people and their individually assigned extensions.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "personnel_extensions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub personnel_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub extension_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
