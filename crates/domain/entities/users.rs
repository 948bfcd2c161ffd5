use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::users;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: i64,
    pub username: String,
    pub language: Option<String>,
    pub ref_boss_id: Option<i64>,
    pub status: bool,
    pub accepted_offer: bool,
    pub created_at: DateTime<Utc>,
    pub promocode: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub map_binding: Option<bool>,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub username: Option<String>,
    pub language: Option<String>,
    pub ref_boss_id: Option<i64>,
    pub status: Option<bool>,
    pub accepted_offer: Option<bool>,
    pub promocode: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub map_binding: Option<bool>,
}

impl UserChangeset {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
