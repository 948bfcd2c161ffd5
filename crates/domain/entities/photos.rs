use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::photos;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = photos)]
pub struct PhotoEntity {
    pub id: i64,
    pub questionnaire_id: i64,
    pub path: String,
    pub scene: String,
    #[diesel(column_name = type_)]
    pub type_photo: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = photos)]
pub struct InsertPhotoEntity {
    pub questionnaire_id: i64,
    pub path: String,
    pub scene: String,
    #[diesel(column_name = type_)]
    pub type_photo: String,
    pub created_at: Option<DateTime<Utc>>,
}
