use std::sync::Arc;

use anyhow::Result;
use crates::domain::{
    errors::DomainError,
    repositories::reviews::ReviewRepository,
    value_objects::{
        pagination::Pagination,
        reviews::{ReviewDto, ReviewFilter, ReviewResponse, ReviewsListResponse},
    },
};
use tracing::error;

pub struct ReviewsUseCase<R>
where
    R: ReviewRepository + Send + Sync + 'static,
{
    review_repository: Arc<R>,
}

impl<R> ReviewsUseCase<R>
where
    R: ReviewRepository + Send + Sync + 'static,
{
    pub fn new(review_repository: Arc<R>) -> Self {
        Self { review_repository }
    }

    pub async fn get_review(&self, review_id: i64) -> Result<ReviewResponse> {
        if review_id <= 0 {
            return Err(DomainError::validation("invalid review id").into());
        }

        let review = self.review_repository.find_by_id(review_id).await?;

        Ok(ReviewResponse {
            review: ReviewDto::from(review),
        })
    }

    pub async fn list_reviews(
        &self,
        filter: ReviewFilter,
        pagination: Pagination,
    ) -> Result<ReviewsListResponse> {
        let reviews = self
            .review_repository
            .list(filter.clone(), pagination)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to list reviews");
                err
            })?;

        let total = self.review_repository.count(filter).await?;

        Ok(ReviewsListResponse {
            reviews: reviews.into_iter().map(ReviewDto::from).collect(),
            total,
        })
    }
}
