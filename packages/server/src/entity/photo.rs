use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Client-supplied display name, sanitized before storage.
    pub original_name: String,

    /// Server-generated blob key. Unique and immutable once assigned.
    #[sea_orm(unique)]
    pub stored_name: String,

    pub created_at: DateTimeUtc,

    #[sea_orm(has_many, via = "share_photo")]
    pub shares: HasMany<super::share_link::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
