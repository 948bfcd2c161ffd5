use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            pagination::Pagination,
            status::StatusResponse,
            users::{
                DEFAULT_USERS_LIMIT, UpdateUserModel, UserResponse, UsersFilter, UsersListResponse,
            },
        },
    },
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    axum_http::{
        error_responses::AppError,
        query_params::{parse_bool, parse_date, parse_i64},
        routers::parse_path_id,
    },
    usecases::users::UsersUseCase,
};

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    page: Option<String>,
    limit: Option<String>,
    status: Option<String>,
    accepted_offer: Option<String>,
    promocode: Option<String>,
    age_from: Option<String>,
    age_to: Option<String>,
    gender: Option<String>,
    map_binding: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
}

impl UsersQuery {
    fn into_parts(self) -> Result<(UsersFilter, Pagination), AppError> {
        let filter = UsersFilter {
            status: parse_bool(self.status.as_deref()),
            accepted_offer: parse_bool(self.accepted_offer.as_deref()),
            date_from: parse_date("date_from", self.date_from.as_deref(), false)?,
            date_to: parse_date("date_to", self.date_to.as_deref(), true)?,
            promocode: self.promocode.filter(|p| !p.trim().is_empty()),
            age_from: parse_i64(self.age_from.as_deref()),
            age_to: parse_i64(self.age_to.as_deref()),
            gender: self.gender.map(|g| g.trim().to_string()).filter(|g| !g.is_empty()),
            map_binding: parse_bool(self.map_binding.as_deref()),
        };
        let pagination = Pagination::new(
            parse_i64(self.page.as_deref()),
            parse_i64(self.limit.as_deref()),
            DEFAULT_USERS_LIMIT,
        );

        Ok((filter, pagination))
    }
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let usecase = UsersUseCase::new(Arc::new(user_repository));

    router(Arc::new(usecase))
}

pub fn router<U>(usecase: Arc<UsersUseCase<U>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_users))
        .route("/update", post(update_user))
        .route("/:id", get(get_user))
        .with_state(usecase)
}

pub async fn get_user<U>(
    State(usecase): State<Arc<UsersUseCase<U>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<UserResponse>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let user_id = parse_path_id(&raw_id, "user id")?;
    let response = usecase.get_user(user_id).await?;

    Ok(Json(response))
}

pub async fn list_users<U>(
    State(usecase): State<Arc<UsersUseCase<U>>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UsersListResponse>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let (filter, pagination) = query.into_parts()?;
    let response = usecase.list_users(filter, pagination).await?;

    info!(total = response.total, page = pagination.page, "users: list served");
    Ok(Json(response))
}

pub async fn update_user<U>(
    State(usecase): State<Arc<UsersUseCase<U>>>,
    Json(model): Json<UpdateUserModel>,
) -> Result<Json<StatusResponse>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let response = usecase.update_user(model).await?;

    Ok(Json(response))
}
