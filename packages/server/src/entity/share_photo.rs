use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table fixing share membership at creation time.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "share_photo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub share_token: String,
    #[sea_orm(primary_key)]
    pub photo_id: i32,
    #[sea_orm(belongs_to, from = "share_token", to = "token")]
    pub share_link: BelongsTo<super::share_link::Entity>,
    #[sea_orm(belongs_to, from = "photo_id", to = "id")]
    pub photo: BelongsTo<super::photo::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
