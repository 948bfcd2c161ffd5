use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::questionnaires;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = questionnaires)]
pub struct QuestionnaireEntity {
    pub id: i64,
    pub user_id: i64,
    pub answers: Option<serde_json::Value>,
    pub history: String,
    pub storyboard: Option<String>,
    pub status: bool,
    pub payment: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = questionnaires)]
pub struct QuestionnaireChangeset {
    pub user_id: Option<i64>,
    pub answers: Option<serde_json::Value>,
    pub history: Option<String>,
    pub storyboard: Option<String>,
    pub status: Option<bool>,
    pub payment: Option<bool>,
}

impl QuestionnaireChangeset {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
