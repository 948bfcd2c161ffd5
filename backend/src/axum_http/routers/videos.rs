use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            notifier::MediaNotifier, photos::PhotoRepository,
            questionnaires::QuestionnaireRepository, storage::MediaStorage,
            videos::VideoRepository,
        },
        value_objects::{status::StatusResponse, videos::VideosResponse},
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

use crate::{
    axum_http::{
        error_responses::AppError,
        media_form::{collect_parts, parse_video_form},
        query_params::parse_i64,
    },
    usecases::videos::VideosUseCase,
};

#[derive(Debug, Default, Deserialize)]
pub struct VideosQuery {
    questionnaire_id: Option<String>,
    #[serde(rename = "type")]
    video_type: Option<String>,
}

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    storage: Arc<LocalFsStorage>,
    notifier: Arc<TelegramClient>,
) -> Router {
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));
    let questionnaire_repository = QuestionnairePostgres::new(Arc::clone(&db_pool));
    let photo_repository = PhotoPostgres::new(Arc::clone(&db_pool));

    let usecase = VideosUseCase::new(
        Arc::new(video_repository),
        Arc::new(questionnaire_repository),
        Arc::new(photo_repository),
        storage,
        notifier,
    );

    router(Arc::new(usecase))
}

pub fn router<V, Q, P, S, N>(usecase: Arc<VideosUseCase<V, Q, P, S, N>>) -> Router
where
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(get_videos))
        .route("/upload", post(upload_video))
        .with_state(usecase)
}

pub async fn get_videos<V, Q, P, S, N>(
    State(usecase): State<Arc<VideosUseCase<V, Q, P, S, N>>>,
    Query(query): Query<VideosQuery>,
) -> Result<Json<VideosResponse>, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    let questionnaire_id = parse_i64(query.questionnaire_id.as_deref()).unwrap_or_default();
    let video_type = query.video_type.unwrap_or_default();

    Ok(Json(usecase.get_videos(questionnaire_id, &video_type).await?))
}

pub async fn upload_video<V, Q, P, S, N>(
    State(usecase): State<Arc<VideosUseCase<V, Q, P, S, N>>>,
    multipart: Multipart,
) -> Result<Json<StatusResponse>, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    let (model, file) = parse_video_form(collect_parts(multipart).await?)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    Ok(Json(usecase.upload_video(model, file, cancel).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use chrono::Utc;
    use crates::domain::{
        entities::videos::VideoEntity,
        repositories::{
            notifier::MockMediaNotifier, photos::MockPhotoRepository,
            questionnaires::MockQuestionnaireRepository, videos::MockVideoRepository,
        },
        value_objects::enums::video_types::VideoType,
    };
    use mockall::predicate::eq;
    use serde_json::json;

    use crate::axum_http::test_support::{Part, get, json_body, multipart_request, send};

    #[tokio::test]
    async fn demo_upload_marks_questionnaire_without_delivery() {
        let dir = tempfile::tempdir().unwrap();

        let mut videos = MockVideoRepository::new();
        videos
            .expect_insert()
            .withf(|video| {
                video.questionnaire_id == 5
                    && video.type_video == "demo"
                    && video.path.starts_with("videos/")
                    && video.path.ends_with(".webm")
            })
            .times(1)
            .returning(|_| Ok(11));

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires
            .expect_set_status()
            .with(eq(5), eq(true))
            .times(1)
            .returning(|_, _| Ok(()));
        questionnaires.expect_find_by_id().never();

        let mut notifier = MockMediaNotifier::new();
        notifier.expect_send_video().never();

        let app = router(Arc::new(VideosUseCase::new(
            Arc::new(videos),
            Arc::new(questionnaires),
            Arc::new(MockPhotoRepository::new()),
            Arc::new(LocalFsStorage::new(dir.path())),
            Arc::new(notifier),
        )));

        let response = send(
            app,
            multipart_request(
                "/upload",
                &[
                    Part::Text("questionnaire_id", "5"),
                    Part::Text("type", "demo"),
                    Part::File {
                        name: "file",
                        file_name: "blob",
                        content_type: "video/webm",
                        data: b"webm-bytes",
                    },
                ],
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"ok": true, "message": "created"}));
    }

    #[tokio::test]
    async fn list_passes_type_filter() {
        let dir = tempfile::tempdir().unwrap();

        let mut videos = MockVideoRepository::new();
        videos
            .expect_list_by_questionnaire()
            .with(eq(3), eq(Some(VideoType::Demo)))
            .returning(|questionnaire_id, _| {
                Ok(vec![VideoEntity {
                    id: 1,
                    questionnaire_id,
                    path: "videos/demo.mp4".to_string(),
                    type_video: "demo".to_string(),
                    created_at: Utc::now(),
                }])
            });

        let app = router(Arc::new(VideosUseCase::new(
            Arc::new(videos),
            Arc::new(MockQuestionnaireRepository::new()),
            Arc::new(MockPhotoRepository::new()),
            Arc::new(LocalFsStorage::new(dir.path())),
            Arc::new(MockMediaNotifier::new()),
        )));

        let response = send(app, get("/?questionnaire_id=3&type=demo")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["videos"][0]["path"], "videos/demo.mp4");
    }

    #[tokio::test]
    async fn upload_without_file_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(Arc::new(VideosUseCase::new(
            Arc::new(MockVideoRepository::new()),
            Arc::new(MockQuestionnaireRepository::new()),
            Arc::new(MockPhotoRepository::new()),
            Arc::new(LocalFsStorage::new(dir.path())),
            Arc::new(MockMediaNotifier::new()),
        )));

        let response = send(
            app,
            multipart_request("/upload", &[Part::Text("questionnaire_id", "5")]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"message": "file is required"}));
    }
}
