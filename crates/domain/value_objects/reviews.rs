use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::reviews::ReviewEntity;

pub const DEFAULT_REVIEWS_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub user_id: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDto {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewEntity> for ReviewDto {
    fn from(value: ReviewEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            description: value.description,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review: ReviewDto,
}

#[derive(Debug, Serialize)]
pub struct ReviewsListResponse {
    pub reviews: Vec<ReviewDto>,
    pub total: i64,
}
