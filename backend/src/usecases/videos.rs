use std::{collections::HashSet, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::Utc;
use crates::domain::{
    entities::videos::InsertVideoEntity,
    errors::DomainError,
    repositories::{
        notifier::MediaNotifier, photos::PhotoRepository, questionnaires::QuestionnaireRepository,
        storage::MediaStorage, videos::VideoRepository,
    },
    value_objects::{
        enums::{photo_types::PhotoType, video_types::VideoType},
        media::{UploadedFile, VIDEOS_FOLDER},
        status::StatusResponse,
        videos::{UploadVideoModel, VideoDto, VideosResponse},
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::usecases::{media_delivery::send_final_media, media_submission::reader_of};

/// `""` and `"all"` list every video.
pub fn video_type_filter(raw: &str) -> Option<VideoType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "all" => None,
        other => Some(VideoType::normalize(other)),
    }
}

pub struct VideosUseCase<V, Q, P, S, N>
where
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    video_repository: Arc<V>,
    questionnaire_repository: Arc<Q>,
    photo_repository: Arc<P>,
    storage: Arc<S>,
    notifier: Arc<N>,
}

impl<V, Q, P, S, N> VideosUseCase<V, Q, P, S, N>
where
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    pub fn new(
        video_repository: Arc<V>,
        questionnaire_repository: Arc<Q>,
        photo_repository: Arc<P>,
        storage: Arc<S>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            video_repository,
            questionnaire_repository,
            photo_repository,
            storage,
            notifier,
        }
    }

    pub async fn get_videos(&self, questionnaire_id: i64, video_type: &str) -> Result<VideosResponse> {
        if questionnaire_id <= 0 {
            return Err(DomainError::validation("invalid questionnaire id").into());
        }

        let videos = self
            .video_repository
            .list_by_questionnaire(questionnaire_id, video_type_filter(video_type))
            .await
            .map_err(|err| {
                error!(%questionnaire_id, db_error = ?err, "videos: failed to list videos");
                err
            })?;

        Ok(VideosResponse {
            videos: videos.into_iter().map(VideoDto::from).collect(),
        })
    }

    pub async fn upload_video(
        &self,
        model: UploadVideoModel,
        file: UploadedFile,
        cancel: CancellationToken,
    ) -> Result<StatusResponse> {
        let questionnaire_id = model.questionnaire_id;
        if questionnaire_id <= 0 {
            return Err(DomainError::validation("invalid questionnaire id").into());
        }

        let video_type = VideoType::normalize(&model.type_video);

        let path = self
            .storage
            .save_to(VIDEOS_FOLDER.to_string(), reader_of(&file), file.video_ext(), cancel)
            .await
            .context("save video")?;

        let video = InsertVideoEntity {
            questionnaire_id,
            path: path.clone(),
            type_video: video_type.to_string(),
            created_at: Utc::now(),
        };

        if let Err(err) = self.video_repository.insert(video).await {
            error!(%questionnaire_id, db_error = ?err, "videos: failed to insert video");
            self.discard(&path).await;
            return Err(err);
        }

        if let Err(err) = self
            .questionnaire_repository
            .set_status(questionnaire_id, true)
            .await
        {
            error!(%questionnaire_id, db_error = ?err, "videos: failed to update questionnaire status");
            self.discard(&path).await;
            return Err(err);
        }

        info!(%questionnaire_id, %path, video_type = %video_type, "videos: video uploaded");

        if video_type == VideoType::Send {
            self.deliver(questionnaire_id, &path).await?;
        }

        Ok(StatusResponse::ok("created"))
    }

    async fn deliver(&self, questionnaire_id: i64, video_path: &str) -> Result<()> {
        let questionnaire = self
            .questionnaire_repository
            .find_by_id(questionnaire_id)
            .await
            .context("load questionnaire for delivery")?;

        if questionnaire.user_id <= 0 {
            warn!(%questionnaire_id, user_id = questionnaire.user_id, "videos: questionnaire has no user, skipping delivery");
            return Ok(());
        }

        let video = self
            .storage
            .resolve_path(video_path)
            .with_context(|| format!("resolve video path {video_path}"))?;

        let photos = match self
            .photo_repository
            .list_by_questionnaire(questionnaire_id, Some(PhotoType::Send))
            .await
        {
            Ok(photos) => photos,
            Err(err) => {
                warn!(%questionnaire_id, db_error = ?err, "videos: failed to load photos for delivery");
                Vec::new()
            }
        };

        let mut seen: HashSet<PathBuf> = HashSet::new();
        let photos: Vec<PathBuf> = photos
            .into_iter()
            .filter_map(|photo| self.storage.resolve_path(&photo.path))
            .filter(|path| seen.insert(path.clone()))
            .collect();

        send_final_media(
            self.notifier.as_ref(),
            questionnaire.user_id,
            questionnaire_id,
            &photos,
            video,
        )
        .await
    }

    async fn discard(&self, path: &str) {
        if let Err(err) = self.storage.remove(path.to_string()).await {
            warn!(%path, error = ?err, "videos: failed to remove orphaned file");
        }
    }
}
