use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "share_link")]
pub struct Model {
    /// Opaque share token, 32 lowercase hex characters. Never mutated.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    pub created_at: DateTimeUtc,

    #[sea_orm(has_many, via = "share_photo")]
    pub photos: HasMany<super::photo::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
