use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::header::CONTENT_TYPE,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            notifier::MediaNotifier, photos::PhotoRepository,
            questionnaires::QuestionnaireRepository, storage::MediaStorage,
            videos::VideoRepository,
        },
        value_objects::{
            media::{MediaUploads, SubmitMediaRequest},
            pagination::Pagination,
            questionnaires::{
                DEFAULT_QUESTIONNAIRES_LIMIT, QuestionnaireFilter, QuestionnaireResponse,
                QuestionnairesListResponse, UpdateQuestionnaireModel,
            },
            status::StatusResponse,
        },
    },
    infra::{
        db::{
            postgres::postgres_connection::PgPoolSquad,
            repositories::{
                photos::PhotoPostgres, questionnaires::QuestionnairePostgres,
                videos::VideoPostgres,
            },
        },
        storages::local_fs::LocalFsStorage,
        telegram::client::TelegramClient,
    },
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    axum_http::{
        error_responses::AppError,
        media_form::{collect_parts, parse_media_form},
        query_params::{parse_bool, parse_date, parse_i64},
        routers::parse_path_id,
    },
    usecases::{media_submission::MediaSubmissionUseCase, questionnaires::QuestionnairesUseCase},
};

#[derive(Debug, Default, Deserialize)]
pub struct QuestionnairesQuery {
    page: Option<String>,
    limit: Option<String>,
    user_id: Option<String>,
    payment: Option<String>,
    status: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
}

impl QuestionnairesQuery {
    fn into_parts(self) -> Result<(QuestionnaireFilter, Pagination), AppError> {
        let filter = QuestionnaireFilter {
            user_id: parse_i64(self.user_id.as_deref()),
            payment: parse_bool(self.payment.as_deref()),
            status: parse_bool(self.status.as_deref()),
            date_from: parse_date("date_from", self.date_from.as_deref(), false)?,
            date_to: parse_date("date_to", self.date_to.as_deref(), true)?,
        };
        let pagination = Pagination::new(
            parse_i64(self.page.as_deref()),
            parse_i64(self.limit.as_deref()),
            DEFAULT_QUESTIONNAIRES_LIMIT,
        );

        Ok((filter, pagination))
    }
}

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    storage: Arc<LocalFsStorage>,
    notifier: Arc<TelegramClient>,
) -> Router {
    let questionnaire_repository = Arc::new(QuestionnairePostgres::new(Arc::clone(&db_pool)));
    let photo_repository = PhotoPostgres::new(Arc::clone(&db_pool));
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));

    let questionnaires_usecase = QuestionnairesUseCase::new(Arc::clone(&questionnaire_repository));
    let media_usecase = MediaSubmissionUseCase::new(
        Arc::new(photo_repository),
        Arc::new(video_repository),
        questionnaire_repository,
        storage,
        notifier,
    );

    router(Arc::new(questionnaires_usecase)).merge(media_router(Arc::new(media_usecase)))
}

pub fn router<Q>(usecase: Arc<QuestionnairesUseCase<Q>>) -> Router
where
    Q: QuestionnaireRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_questionnaires))
        .route("/update", post(update_questionnaire))
        .route("/:id", get(get_questionnaire))
        .with_state(usecase)
}

pub fn media_router<P, V, Q, S, N>(usecase: Arc<MediaSubmissionUseCase<P, V, Q, S, N>>) -> Router
where
    P: PhotoRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    Router::new()
        .route("/media", post(submit_media))
        .with_state(usecase)
}

pub async fn get_questionnaire<Q>(
    State(usecase): State<Arc<QuestionnairesUseCase<Q>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<QuestionnaireResponse>, AppError>
where
    Q: QuestionnaireRepository + Send + Sync + 'static,
{
    let questionnaire_id = parse_path_id(&raw_id, "questionnaire id")?;

    Ok(Json(usecase.get_questionnaire(questionnaire_id).await?))
}

pub async fn list_questionnaires<Q>(
    State(usecase): State<Arc<QuestionnairesUseCase<Q>>>,
    Query(query): Query<QuestionnairesQuery>,
) -> Result<Json<QuestionnairesListResponse>, AppError>
where
    Q: QuestionnaireRepository + Send + Sync + 'static,
{
    let (filter, pagination) = query.into_parts()?;
    let response = usecase.list_questionnaires(filter, pagination).await?;

    info!(total = response.total, page = pagination.page, "questionnaires: list served");
    Ok(Json(response))
}

pub async fn update_questionnaire<Q>(
    State(usecase): State<Arc<QuestionnairesUseCase<Q>>>,
    Json(model): Json<UpdateQuestionnaireModel>,
) -> Result<Json<StatusResponse>, AppError>
where
    Q: QuestionnaireRepository + Send + Sync + 'static,
{
    Ok(Json(usecase.update_questionnaire(model).await?))
}

/// Accepts either a multipart form (uploads plus path references) or a JSON
/// body carrying path references only.
pub async fn submit_media<P, V, Q, S, N>(
    State(usecase): State<Arc<MediaSubmissionUseCase<P, V, Q, S, N>>>,
    req: Request,
) -> Result<Json<StatusResponse>, AppError>
where
    P: PhotoRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"));

    let (request, uploads) = if is_multipart {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        parse_media_form(collect_parts(multipart).await?)?
    } else {
        let Json(request) = Json::<SubmitMediaRequest>::from_request(req, &())
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        (request, MediaUploads::default())
    };

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    Ok(Json(usecase.submit(request, uploads, cancel).await?))
}
