use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use crates::{
    domain::{
        repositories::reviews::ReviewRepository,
        value_objects::{
            pagination::Pagination,
            reviews::{DEFAULT_REVIEWS_LIMIT, ReviewFilter, ReviewResponse, ReviewsListResponse},
        },
    },
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::reviews::ReviewPostgres},
};
use serde::Deserialize;

use crate::{
    axum_http::{
        error_responses::AppError,
        query_params::{parse_date, parse_i64},
        routers::parse_path_id,
    },
    usecases::reviews::ReviewsUseCase,
};

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    page: Option<String>,
    limit: Option<String>,
    user_id: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let review_repository = ReviewPostgres::new(Arc::clone(&db_pool));
    let usecase = ReviewsUseCase::new(Arc::new(review_repository));

    router(Arc::new(usecase))
}

pub fn router<R>(usecase: Arc<ReviewsUseCase<R>>) -> Router
where
    R: ReviewRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_reviews))
        .route("/:id", get(get_review))
        .with_state(usecase)
}

pub async fn get_review<R>(
    State(usecase): State<Arc<ReviewsUseCase<R>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ReviewResponse>, AppError>
where
    R: ReviewRepository + Send + Sync + 'static,
{
    let review_id = parse_path_id(&raw_id, "review id")?;

    Ok(Json(usecase.get_review(review_id).await?))
}

pub async fn list_reviews<R>(
    State(usecase): State<Arc<ReviewsUseCase<R>>>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<ReviewsListResponse>, AppError>
where
    R: ReviewRepository + Send + Sync + 'static,
{
    let filter = ReviewFilter {
        user_id: parse_i64(query.user_id.as_deref()),
        date_from: parse_date("date_from", query.date_from.as_deref(), false)?,
        date_to: parse_date("date_to", query.date_to.as_deref(), true)?,
    };
    let pagination = Pagination::new(
        parse_i64(query.page.as_deref()),
        parse_i64(query.limit.as_deref()),
        DEFAULT_REVIEWS_LIMIT,
    );

    Ok(Json(usecase.list_reviews(filter, pagination).await?))
}
