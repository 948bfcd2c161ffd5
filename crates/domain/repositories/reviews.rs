use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::reviews::ReviewEntity,
    value_objects::{pagination::Pagination, reviews::ReviewFilter},
};

#[automock]
#[async_trait]
pub trait ReviewRepository {
    async fn find_by_id(&self, review_id: i64) -> Result<ReviewEntity>;
    async fn list(&self, filter: ReviewFilter, pagination: Pagination) -> Result<Vec<ReviewEntity>>;
    async fn count(&self, filter: ReviewFilter) -> Result<i64>;
}
