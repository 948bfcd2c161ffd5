use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{photos::PhotoRepository, storage::MediaStorage},
        value_objects::{photos::PhotosResponse, status::StatusResponse},
    },
    infra::{
        db::{postgres::postgres_connection::PgPoolSquad, repositories::photos::PhotoPostgres},
        storages::local_fs::LocalFsStorage,
    },
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    axum_http::{
        error_responses::AppError,
        media_form::{collect_parts, parse_photo_form},
        query_params::parse_i64,
    },
    usecases::photos::PhotosUseCase,
};

#[derive(Debug, Default, Deserialize)]
pub struct PhotosQuery {
    questionnaire_id: Option<String>,
    #[serde(rename = "type")]
    photo_type: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, storage: Arc<LocalFsStorage>) -> Router {
    let photo_repository = PhotoPostgres::new(Arc::clone(&db_pool));
    let usecase = PhotosUseCase::new(Arc::new(photo_repository), storage);

    router(Arc::new(usecase))
}

pub fn router<P, S>(usecase: Arc<PhotosUseCase<P, S>>) -> Router
where
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(get_photos))
        .route("/upload", post(upload_photo))
        .with_state(usecase)
}

pub async fn get_photos<P, S>(
    State(usecase): State<Arc<PhotosUseCase<P, S>>>,
    Query(query): Query<PhotosQuery>,
) -> Result<Json<PhotosResponse>, AppError>
where
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
{
    let questionnaire_id = parse_i64(query.questionnaire_id.as_deref()).unwrap_or_default();
    let photo_type = query.photo_type.unwrap_or_default();

    Ok(Json(usecase.get_photos(questionnaire_id, &photo_type).await?))
}

pub async fn upload_photo<P, S>(
    State(usecase): State<Arc<PhotosUseCase<P, S>>>,
    multipart: Multipart,
) -> Result<Json<StatusResponse>, AppError>
where
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
{
    let (model, file) = parse_photo_form(collect_parts(multipart).await?)?;

    // Dropping the request cancels the storage copy.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    Ok(Json(usecase.upload_photo(model, file, cancel).await?))
}
