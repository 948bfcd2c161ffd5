use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use crates::domain::{
    entities::photos::InsertPhotoEntity,
    errors::DomainError,
    repositories::{photos::PhotoRepository, storage::MediaStorage},
    value_objects::{
        enums::photo_types::PhotoType,
        media::UploadedFile,
        photos::{PhotoDto, PhotosResponse, UploadPhotoModel},
        status::StatusResponse,
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::usecases::media_submission::reader_of;

/// `""` means originals, `"all"` lifts the filter. Unknown tags fall back to
/// originals.
pub fn photo_type_filter(raw: &str) -> Option<PhotoType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" => None,
        other => Some(PhotoType::normalize_or(other, PhotoType::Original)),
    }
}

pub struct PhotosUseCase<P, S>
where
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
{
    photo_repository: Arc<P>,
    storage: Arc<S>,
}

impl<P, S> PhotosUseCase<P, S>
where
    P: PhotoRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
{
    pub fn new(photo_repository: Arc<P>, storage: Arc<S>) -> Self {
        Self {
            photo_repository,
            storage,
        }
    }

    pub async fn get_photos(&self, questionnaire_id: i64, photo_type: &str) -> Result<PhotosResponse> {
        if questionnaire_id <= 0 {
            return Err(DomainError::validation("invalid questionnaire id").into());
        }

        let photos = self
            .photo_repository
            .list_by_questionnaire(questionnaire_id, photo_type_filter(photo_type))
            .await
            .map_err(|err| {
                error!(%questionnaire_id, db_error = ?err, "photos: failed to list photos");
                err
            })?;

        Ok(PhotosResponse {
            photos: photos.into_iter().map(PhotoDto::from).collect(),
        })
    }

    pub async fn upload_photo(
        &self,
        model: UploadPhotoModel,
        file: UploadedFile,
        cancel: CancellationToken,
    ) -> Result<StatusResponse> {
        let questionnaire_id = model.questionnaire_id;
        if questionnaire_id <= 0 {
            return Err(DomainError::validation("invalid questionnaire id").into());
        }

        let path = self
            .storage
            .save(reader_of(&file), file.photo_ext().to_string(), cancel)
            .await
            .context("save photo")?;

        let photo = InsertPhotoEntity {
            questionnaire_id,
            path: path.clone(),
            scene: model.scene.trim().to_string(),
            type_photo: PhotoType::normalize_or(&model.type_photo, PhotoType::Original).to_string(),
            created_at: Some(Utc::now()),
        };

        let photo_id = match self.photo_repository.insert(photo).await {
            Ok(id) => id,
            Err(err) => {
                error!(%questionnaire_id, db_error = ?err, "photos: failed to insert photo");
                if let Err(remove_err) = self.storage.remove(path.clone()).await {
                    warn!(%path, error = ?remove_err, "photos: failed to remove orphaned file");
                }
                return Err(err);
            }
        };

        info!(%questionnaire_id, %photo_id, %path, "photos: photo uploaded");

        Ok(StatusResponse::ok("created"))
    }
}
