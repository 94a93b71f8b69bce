//! Key/value settings.

use sea_orm::{sea_query::OnConflict, ConnectionTrait, EntityTrait, Set};

use super::entities::setting::{self, ActiveModel, Entity as SettingEntity};
use crate::errors::AppResult;

pub struct SettingRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SettingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let result = SettingEntity::find_by_id(key.to_string())
            .one(self.db)
            .await?;

        Ok(result.map(|row| row.value))
    }

    /// Insert or overwrite
    pub async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let row = ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        };

        SettingEntity::insert(row)
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .update_column(setting::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }
}
