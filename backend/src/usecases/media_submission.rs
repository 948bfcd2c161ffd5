use std::{collections::HashSet, io::Cursor, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::Utc;
use crates::domain::{
    entities::{photos::InsertPhotoEntity, videos::InsertVideoEntity},
    errors::DomainError,
    repositories::{
        notifier::MediaNotifier,
        photos::PhotoRepository,
        questionnaires::QuestionnaireRepository,
        storage::{MediaReader, MediaStorage},
        videos::VideoRepository,
    },
    value_objects::{
        enums::{photo_types::PhotoType, video_types::VideoType},
        media::{
            FinalPhotoRef, GeneratedVideoRef, MediaUploads, SCENE_DELIVERY, SCENE_DEMO,
            SCENE_RESULT, SubmitMediaRequest, UploadedFile, VIDEOS_FOLDER,
        },
        status::StatusResponse,
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::usecases::media_delivery::send_demo_media;

pub(crate) fn reader_of(file: &UploadedFile) -> MediaReader {
    Box::new(Cursor::new(file.data.clone()))
}

pub struct MediaSubmissionUseCase<P, V, Q, S, N>
where
    P: PhotoRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    photo_repository: Arc<P>,
    video_repository: Arc<V>,
    questionnaire_repository: Arc<Q>,
    storage: Arc<S>,
    notifier: Arc<N>,
}

/// Everything a submission ends up persisting, once uploads are saved.
#[derive(Debug, Default)]
struct CollectedMedia {
    demo_photos: Vec<String>,
    final_photos: Vec<FinalPhotoRef>,
    demo_video: Option<String>,
    generated_video: Option<GeneratedVideoRef>,
}

impl<P, V, Q, S, N> MediaSubmissionUseCase<P, V, Q, S, N>
where
    P: PhotoRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
    Q: QuestionnaireRepository + Send + Sync + 'static,
    S: MediaStorage + Send + Sync + 'static,
    N: MediaNotifier + Send + Sync + 'static,
{
    pub fn new(
        photo_repository: Arc<P>,
        video_repository: Arc<V>,
        questionnaire_repository: Arc<Q>,
        storage: Arc<S>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            photo_repository,
            video_repository,
            questionnaire_repository,
            storage,
            notifier,
        }
    }

    pub async fn submit(
        &self,
        request: SubmitMediaRequest,
        uploads: MediaUploads,
        cancel: CancellationToken,
    ) -> Result<StatusResponse> {
        let questionnaire_id = request.questionnaire_id;
        let user_id = request.user_id;

        if questionnaire_id <= 0 {
            return Err(DomainError::validation("invalid questionnaire id").into());
        }
        if user_id <= 0 {
            return Err(DomainError::validation("invalid user id").into());
        }

        info!(
            %questionnaire_id,
            %user_id,
            demo_uploads = uploads.demo_photos.len(),
            final_uploads = uploads.final_photos.len(),
            "media_submission: submit requested"
        );

        let mut collected = CollectedMedia {
            demo_photos: request.demo_photos,
            final_photos: request.final_photos,
            demo_video: Some(request.demo_video).filter(|path| !path.trim().is_empty()),
            generated_video: request
                .generated_video
                .filter(|video| !video.path.trim().is_empty()),
        };

        self.save_uploads(uploads, &mut collected, &cancel).await?;

        let demo_photos = self
            .demo_photo_set(questionnaire_id, collected.demo_photos)
            .await?;

        let demo_video_abs = match &collected.demo_video {
            Some(path) => Some(self.storage.resolve_path(path).ok_or_else(|| {
                DomainError::validation(format!("invalid demo video path: {path}"))
            })?),
            None => None,
        };

        if !demo_photos.to_send.is_empty() || demo_video_abs.is_some() {
            send_demo_media(
                self.notifier.as_ref(),
                user_id,
                questionnaire_id,
                &demo_photos.to_send,
                demo_video_abs,
            )
            .await
            .map_err(|err| {
                error!(%questionnaire_id, %user_id, error = ?err, "media_submission: demo notification failed");
                err
            })?;
        }

        let mut media_added = false;
        let now = Utc::now();

        for path in demo_photos.to_persist {
            self.photo_repository
                .insert(InsertPhotoEntity {
                    questionnaire_id,
                    path,
                    scene: SCENE_DEMO.to_string(),
                    type_photo: PhotoType::Demo.to_string(),
                    created_at: Some(now),
                })
                .await
                .context("insert demo photo")?;
            media_added = true;
        }

        for photo in collected.final_photos {
            if photo.path.trim().is_empty() {
                continue;
            }
            let scene = match photo.scene.trim() {
                "" => SCENE_RESULT.to_string(),
                scene => scene.to_string(),
            };
            self.photo_repository
                .insert(InsertPhotoEntity {
                    questionnaire_id,
                    path: photo.path,
                    scene,
                    type_photo: PhotoType::normalize_or(&photo.type_photo, PhotoType::Send)
                        .to_string(),
                    created_at: Some(now),
                })
                .await
                .context("insert final photo")?;
            media_added = true;
        }

        if let Some(video) = collected.generated_video {
            self.video_repository
                .insert(InsertVideoEntity {
                    questionnaire_id,
                    path: video.path,
                    type_video: VideoType::normalize(&video.type_video).to_string(),
                    created_at: now,
                })
                .await
                .context("insert generated video")?;
            media_added = true;
        }

        if let Some(path) = collected.demo_video {
            self.video_repository
                .insert(InsertVideoEntity {
                    questionnaire_id,
                    path,
                    type_video: VideoType::Demo.to_string(),
                    created_at: now,
                })
                .await
                .context("insert demo video")?;
            media_added = true;
        }

        if media_added {
            self.questionnaire_repository
                .set_status(questionnaire_id, true)
                .await
                .context("mark questionnaire as processed")?;
        }

        info!(%questionnaire_id, media_added, "media_submission: saved");

        Ok(StatusResponse::ok("saved"))
    }

    async fn save_uploads(
        &self,
        uploads: MediaUploads,
        collected: &mut CollectedMedia,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let MediaUploads {
            demo_photos,
            final_photos,
            demo_video,
            generated_video,
            delivery_photo,
            mut final_photo_scenes,
        } = uploads;

        for file in &demo_photos {
            let path = self
                .storage
                .save(reader_of(file), file.photo_ext().to_string(), cancel.clone())
                .await
                .context("save demo photo")?;
            collected.demo_photos.push(path);
        }

        for file in &final_photos {
            let path = self
                .storage
                .save(reader_of(file), file.photo_ext().to_string(), cancel.clone())
                .await
                .context("save final photo")?;
            collected.final_photos.push(FinalPhotoRef {
                path,
                scene: final_photo_scenes.pop(),
                type_photo: PhotoType::Send.to_string(),
            });
        }

        if let Some(file) = &delivery_photo {
            let path = self
                .storage
                .save(reader_of(file), file.photo_ext().to_string(), cancel.clone())
                .await
                .context("save delivery photo")?;
            collected.final_photos.push(FinalPhotoRef {
                path,
                scene: SCENE_DELIVERY.to_string(),
                type_photo: PhotoType::Send.to_string(),
            });
        }

        if let Some(file) = &demo_video {
            let path = self
                .storage
                .save_to(VIDEOS_FOLDER.to_string(), reader_of(file), file.video_ext(), cancel.clone())
                .await
                .context("save demo video")?;
            collected.demo_video = Some(path);
        }

        if let Some(file) = &generated_video {
            let path = self
                .storage
                .save_to(VIDEOS_FOLDER.to_string(), reader_of(file), file.video_ext(), cancel.clone())
                .await
                .context("save generated video")?;
            collected.generated_video = Some(GeneratedVideoRef {
                path,
                type_video: VideoType::Send.to_string(),
            });
        }

        Ok(())
    }

    /// Dedups the submitted demo photos by absolute path and merges in the
    /// demo photos already stored for the questionnaire. Stored rows that no
    /// longer resolve inside the storage root are skipped; a submitted path
    /// that escapes it is a validation error.
    async fn demo_photo_set(&self, questionnaire_id: i64, submitted: Vec<String>) -> Result<DemoPhotoSet> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut set = DemoPhotoSet::default();

        match self
            .photo_repository
            .list_by_questionnaire(questionnaire_id, Some(PhotoType::Demo))
            .await
        {
            Ok(stored) => {
                for photo in stored {
                    let Some(absolute) = self.storage.resolve_path(&photo.path) else {
                        warn!(%questionnaire_id, path = %photo.path, "media_submission: skipping unresolvable stored demo photo");
                        continue;
                    };
                    if seen.insert(absolute.clone()) {
                        set.to_send.push(absolute);
                    }
                }
            }
            Err(err) => {
                warn!(%questionnaire_id, error = ?err, "media_submission: failed to load stored demo photos");
            }
        }

        for path in submitted {
            if path.trim().is_empty() {
                continue;
            }
            let absolute = self.storage.resolve_path(&path).ok_or_else(|| {
                DomainError::validation(format!("invalid demo photo path: {path}"))
            })?;
            if seen.insert(absolute.clone()) {
                set.to_send.push(absolute);
                set.to_persist.push(path);
            }
        }

        Ok(set)
    }
}

#[derive(Debug, Default)]
struct DemoPhotoSet {
    to_send: Vec<PathBuf>,
    to_persist: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crates::domain::{
        entities::photos::PhotoEntity,
        repositories::{
            notifier::MockMediaNotifier, photos::MockPhotoRepository,
            questionnaires::MockQuestionnaireRepository, storage::MockMediaStorage,
            videos::MockVideoRepository,
        },
    };
    use crates::infra::storages::local_fs::LocalFsStorage;
    use mockall::predicate::eq;
    use std::sync::Mutex;

    fn storage_resolving_under(base: &'static str) -> MockMediaStorage {
        let mut storage = MockMediaStorage::new();
        storage
            .expect_resolve_path()
            .returning(move |path: &str| Some(PathBuf::from(base).join(path.trim_start_matches("./"))));
        storage
    }

    fn image(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            data: Bytes::from_static(b"\xFF\xD8\xFF"),
        }
    }

    fn usecase(
        photos: MockPhotoRepository,
        videos: MockVideoRepository,
        questionnaires: MockQuestionnaireRepository,
        storage: MockMediaStorage,
        notifier: MockMediaNotifier,
    ) -> MediaSubmissionUseCase<
        MockPhotoRepository,
        MockVideoRepository,
        MockQuestionnaireRepository,
        MockMediaStorage,
        MockMediaNotifier,
    > {
        MediaSubmissionUseCase::new(
            Arc::new(photos),
            Arc::new(videos),
            Arc::new(questionnaires),
            Arc::new(storage),
            Arc::new(notifier),
        )
    }

    #[tokio::test]
    async fn rejects_non_positive_ids_before_any_io() {
        let usecase = usecase(
            MockPhotoRepository::new(),
            MockVideoRepository::new(),
            MockQuestionnaireRepository::new(),
            MockMediaStorage::new(),
            MockMediaNotifier::new(),
        );

        let err = usecase
            .submit(
                SubmitMediaRequest { questionnaire_id: 0, user_id: 1, ..Default::default() },
                MediaUploads::default(),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            DomainError::find(&err),
            Some(&DomainError::validation("invalid questionnaire id"))
        );

        let err = usecase
            .submit(
                SubmitMediaRequest { questionnaire_id: 3, user_id: -1, ..Default::default() },
                MediaUploads::default(),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(DomainError::find(&err), Some(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn demo_photos_are_deduped_by_absolute_path() {
        let mut photos = MockPhotoRepository::new();
        photos
            .expect_list_by_questionnaire()
            .with(eq(7), eq(Some(PhotoType::Demo)))
            .returning(|_, _| {
                Ok(vec![PhotoEntity {
                    id: 1,
                    questionnaire_id: 7,
                    path: "photos/old.jpg".to_string(),
                    scene: "demo".to_string(),
                    type_photo: "demo".to_string(),
                    created_at: None,
                }])
            });
        let inserted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&inserted);
        photos.expect_insert().returning(move |photo| {
            sink.lock().unwrap().push(photo);
            Ok(10)
        });

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires
            .expect_set_status()
            .with(eq(7), eq(true))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut notifier = MockMediaNotifier::new();
        notifier
            .expect_send_photo()
            .times(2)
            .returning(|_, _, _, _| Ok(()));

        let request = SubmitMediaRequest {
            questionnaire_id: 7,
            user_id: 100,
            demo_photos: vec![
                "photos/a.jpg".to_string(),
                "./photos/a.jpg".to_string(),
                "photos/old.jpg".to_string(),
            ],
            ..Default::default()
        };

        let status = usecase(
            photos,
            MockVideoRepository::new(),
            questionnaires,
            storage_resolving_under("/data"),
            notifier,
        )
        .submit(request, MediaUploads::default(), CancellationToken::new())
        .await
        .unwrap();

        assert_eq!(status, StatusResponse::ok("saved"));
        let inserted = inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].path, "photos/a.jpg");
        assert_eq!(inserted[0].type_photo, "demo");
        assert_eq!(inserted[0].scene, "demo");
    }

    #[tokio::test]
    async fn final_uploads_take_queued_scenes_then_send() {
        let mut photos = MockPhotoRepository::new();
        photos
            .expect_list_by_questionnaire()
            .returning(|_, _| Ok(Vec::new()));
        let inserted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&inserted);
        photos.expect_insert().returning(move |photo| {
            sink.lock().unwrap().push(photo);
            Ok(1)
        });

        let mut storage = storage_resolving_under("/data");
        let mut saved = 0;
        storage.expect_save().times(3).returning(move |_, ext, _| {
            saved += 1;
            Ok(format!("photos/{saved}{ext}"))
        });

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires.expect_set_status().returning(|_, _| Ok(()));

        let mut notifier = MockMediaNotifier::new();
        notifier.expect_send_photo().never();

        let mut uploads = MediaUploads {
            final_photos: vec![image("1.jpg"), image("2.JPEG"), image("3.png")],
            ..Default::default()
        };
        uploads.final_photo_scenes.push("intro");
        uploads.final_photo_scenes.push("finale");

        usecase(photos, MockVideoRepository::new(), questionnaires, storage, notifier)
            .submit(
                SubmitMediaRequest { questionnaire_id: 2, user_id: 5, ..Default::default() },
                uploads,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        let inserted = inserted.lock().unwrap();
        let scenes: Vec<_> = inserted.iter().map(|p| p.scene.as_str()).collect();
        let paths: Vec<_> = inserted.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(scenes, vec!["intro", "finale", "send"]);
        assert_eq!(paths, vec!["photos/1.jpg", "photos/2.jpg", "photos/3.png"]);
        assert!(inserted.iter().all(|p| p.type_photo == "send"));
    }

    #[tokio::test]
    async fn referenced_final_photos_default_scene_and_type() {
        let mut photos = MockPhotoRepository::new();
        photos
            .expect_list_by_questionnaire()
            .returning(|_, _| Ok(Vec::new()));
        photos
            .expect_insert()
            .withf(|photo| {
                photo.path == "photos/r.jpg" && photo.scene == "result" && photo.type_photo == "send"
            })
            .times(1)
            .returning(|_| Ok(1));

        let mut videos = MockVideoRepository::new();
        videos
            .expect_insert()
            .withf(|video| video.path == "videos/g.mp4" && video.type_video == "send")
            .times(1)
            .returning(|_| Ok(2));

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires.expect_set_status().times(1).returning(|_, _| Ok(()));

        let request = SubmitMediaRequest {
            questionnaire_id: 2,
            user_id: 5,
            final_photos: vec![FinalPhotoRef {
                path: "photos/r.jpg".to_string(),
                scene: " ".to_string(),
                type_photo: "bogus".to_string(),
            }],
            generated_video: Some(GeneratedVideoRef {
                path: "videos/g.mp4".to_string(),
                type_video: String::new(),
            }),
            ..Default::default()
        };

        usecase(
            photos,
            videos,
            questionnaires,
            storage_resolving_under("/data"),
            MockMediaNotifier::new(),
        )
        .submit(request, MediaUploads::default(), CancellationToken::new())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn demo_video_upload_is_sent_and_stored_as_demo() {
        let mut photos = MockPhotoRepository::new();
        photos
            .expect_list_by_questionnaire()
            .returning(|_, _| Err(anyhow::anyhow!("db down")));
        photos.expect_insert().never();

        let mut storage = storage_resolving_under("/data");
        storage
            .expect_save_to()
            .withf(|folder, _, ext, _| folder == "videos" && ext == ".webm")
            .times(1)
            .returning(|_, _, _, _| Ok("videos/d.webm".to_string()));

        let mut videos = MockVideoRepository::new();
        videos
            .expect_insert()
            .withf(|video| video.path == "videos/d.webm" && video.type_video == "demo")
            .times(1)
            .returning(|_| Ok(3));

        let mut notifier = MockMediaNotifier::new();
        notifier
            .expect_send_video()
            .withf(|chat_id, path, _, markup| {
                *chat_id == 100 && path == &PathBuf::from("/data/videos/d.webm") && markup.is_some()
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires.expect_set_status().times(1).returning(|_, _| Ok(()));

        let uploads = MediaUploads {
            demo_video: Some(UploadedFile {
                file_name: "upload".to_string(),
                content_type: Some("video/webm".to_string()),
                data: Bytes::from_static(b"webm"),
            }),
            ..Default::default()
        };

        usecase(photos, videos, questionnaires, storage, notifier)
            .submit(
                SubmitMediaRequest { questionnaire_id: 7, user_id: 100, ..Default::default() },
                uploads,
                CancellationToken::new(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn notifier_failure_aborts_before_persisting() {
        let mut photos = MockPhotoRepository::new();
        photos
            .expect_list_by_questionnaire()
            .returning(|_, _| Ok(Vec::new()));
        photos.expect_insert().never();

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires.expect_set_status().never();

        let mut notifier = MockMediaNotifier::new();
        notifier
            .expect_send_photo()
            .returning(|_, _, _, _| Err(anyhow::anyhow!("telegram sendPhoto error: blocked")));

        let request = SubmitMediaRequest {
            questionnaire_id: 7,
            user_id: 100,
            demo_photos: vec!["photos/a.jpg".to_string()],
            ..Default::default()
        };

        let result = usecase(
            photos,
            MockVideoRepository::new(),
            questionnaires,
            storage_resolving_under("/data"),
            notifier,
        )
        .submit(request, MediaUploads::default(), CancellationToken::new())
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn nothing_submitted_leaves_status_alone() {
        let mut photos = MockPhotoRepository::new();
        photos
            .expect_list_by_questionnaire()
            .returning(|_, _| Ok(Vec::new()));
        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires.expect_set_status().never();

        let status = usecase(
            photos,
            MockVideoRepository::new(),
            questionnaires,
            MockMediaStorage::new(),
            MockMediaNotifier::new(),
        )
        .submit(
            SubmitMediaRequest { questionnaire_id: 7, user_id: 1, ..Default::default() },
            MediaUploads::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusResponse::ok("saved"));
    }

    #[tokio::test]
    async fn demo_photo_outside_storage_root_is_rejected_unsent() {
        let dir = tempfile::tempdir().unwrap();

        let mut photos = MockPhotoRepository::new();
        photos
            .expect_list_by_questionnaire()
            .returning(|_, _| Ok(Vec::new()));
        photos.expect_insert().never();

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires.expect_set_status().never();

        let mut notifier = MockMediaNotifier::new();
        notifier.expect_send_photo().never();

        let usecase = MediaSubmissionUseCase::new(
            Arc::new(photos),
            Arc::new(MockVideoRepository::new()),
            Arc::new(questionnaires),
            Arc::new(LocalFsStorage::new(dir.path())),
            Arc::new(notifier),
        );

        let request = SubmitMediaRequest {
            questionnaire_id: 7,
            user_id: 100,
            demo_photos: vec!["../../etc/passwd".to_string()],
            ..Default::default()
        };

        let err = usecase
            .submit(request, MediaUploads::default(), CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            DomainError::find(&err),
            Some(&DomainError::validation("invalid demo photo path: ../../etc/passwd"))
        );
    }

    #[tokio::test]
    async fn stored_demo_photo_outside_storage_root_is_skipped() {
        let dir = tempfile::tempdir().unwrap();

        let mut photos = MockPhotoRepository::new();
        photos.expect_list_by_questionnaire().returning(|_, _| {
            Ok(vec![PhotoEntity {
                id: 1,
                questionnaire_id: 7,
                path: "../outside.jpg".to_string(),
                scene: "demo".to_string(),
                type_photo: "demo".to_string(),
                created_at: None,
            }])
        });
        photos.expect_insert().times(1).returning(|_| Ok(2));

        let mut questionnaires = MockQuestionnaireRepository::new();
        questionnaires
            .expect_set_status()
            .times(1)
            .returning(|_, _| Ok(()));

        let base = dir.path().to_path_buf();
        let mut notifier = MockMediaNotifier::new();
        notifier
            .expect_send_photo()
            .withf(move |_, path, _, markup| path.starts_with(&base) && markup.is_some())
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let usecase = MediaSubmissionUseCase::new(
            Arc::new(photos),
            Arc::new(MockVideoRepository::new()),
            Arc::new(questionnaires),
            Arc::new(LocalFsStorage::new(dir.path())),
            Arc::new(notifier),
        );

        let request = SubmitMediaRequest {
            questionnaire_id: 7,
            user_id: 100,
            demo_photos: vec!["photos/new.jpg".to_string()],
            ..Default::default()
        };

        let status = usecase
            .submit(request, MediaUploads::default(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(status, StatusResponse::ok("saved"));
    }
}
