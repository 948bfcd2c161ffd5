use axum::extract::Multipart;
use crates::domain::value_objects::{
    media::{
        FinalPhotoRef, GeneratedVideoRef, MediaUploads, SCENE_DELIVERY, SCENE_RESULT, SceneQueue,
        SubmitMediaRequest, UploadedFile,
    },
    enums::photo_types::PhotoType,
    photos::UploadPhotoModel,
    videos::UploadVideoModel,
};

use crate::axum_http::{error_responses::AppError, query_params::parse_i64};

/// One multipart field. A part with a file name is a file, anything else is
/// text.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: UploadedFile },
}

/// Buffers every field in arrival order.
pub async fn collect_parts(mut multipart: Multipart) -> Result<Vec<FormPart>, AppError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("invalid multipart form: {}", err.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("invalid multipart field {name}: {}", err.body_text())))?;

        match file_name {
            Some(file_name) => parts.push(FormPart::File {
                name,
                file: UploadedFile {
                    file_name,
                    content_type,
                    data,
                },
            }),
            None => parts.push(FormPart::Text {
                name,
                value: String::from_utf8_lossy(&data).trim().to_string(),
            }),
        }
    }

    Ok(parts)
}

/// Splits a media submission form into path references and uploads.
pub fn parse_media_form(parts: Vec<FormPart>) -> Result<(SubmitMediaRequest, MediaUploads), AppError> {
    let mut request = SubmitMediaRequest::default();
    let mut uploads = MediaUploads::default();
    let mut scenes = SceneQueue::default();

    // Scenes first: path references pop from the same queue as uploads.
    for part in &parts {
        if let FormPart::Text { name, value } = part {
            if name == "payload" && !value.is_empty() {
                let payload: SubmitMediaRequest = serde_json::from_str(value)
                    .map_err(|err| AppError::BadRequest(format!("invalid payload: {err}")))?;
                merge_payload(&mut request, &mut scenes, payload);
            }
        }
    }
    for part in &parts {
        if let FormPart::Text { name, value } = part {
            if name == "final_photo_scene" && !value.is_empty() {
                scenes.push(value.clone());
            }
        }
    }

    for part in parts {
        match part {
            FormPart::Text { name, value } => {
                if value.is_empty() {
                    continue;
                }
                match name.as_str() {
                    "questionnaire_id" => request.questionnaire_id = parse_i64(Some(&value)).unwrap_or_default(),
                    "user_id" => request.user_id = parse_i64(Some(&value)).unwrap_or_default(),
                    "demo_photo_path" => request.demo_photos.push(value),
                    "final_photo_path" => request.final_photos.push(FinalPhotoRef {
                        path: value,
                        scene: scenes.pop(),
                        type_photo: PhotoType::Send.to_string(),
                    }),
                    "delivery_photo_path" => request.final_photos.push(FinalPhotoRef {
                        path: value,
                        scene: SCENE_DELIVERY.to_string(),
                        type_photo: PhotoType::Send.to_string(),
                    }),
                    "demo_video_path" => request.demo_video = value,
                    "generated_video_path" => {
                        request.generated_video = Some(GeneratedVideoRef {
                            path: value,
                            type_video: String::new(),
                        })
                    }
                    _ => {}
                }
            }
            FormPart::File { name, file } => match name.as_str() {
                "demo_photos" => uploads.demo_photos.push(file),
                "final_photos" => uploads.final_photos.push(file),
                "demo_video" => uploads.demo_video = Some(file),
                "generated_video" => uploads.generated_video = Some(file),
                "delivery_photo" => uploads.delivery_photo = Some(file),
                _ => {}
            },
        }
    }

    uploads.final_photo_scenes = scenes;

    Ok((request, uploads))
}

fn merge_payload(request: &mut SubmitMediaRequest, scenes: &mut SceneQueue, payload: SubmitMediaRequest) {
    if payload.questionnaire_id != 0 {
        request.questionnaire_id = payload.questionnaire_id;
    }
    if payload.user_id != 0 {
        request.user_id = payload.user_id;
    }

    request.demo_photos.extend(payload.demo_photos);

    for photo in payload.final_photos {
        if photo.path.trim().is_empty() {
            match photo.scene.trim() {
                "" => scenes.push(SCENE_RESULT),
                scene => scenes.push(scene),
            }
        } else {
            request.final_photos.push(photo);
        }
    }

    if !payload.demo_video.trim().is_empty() {
        request.demo_video = payload.demo_video;
    }
    if payload.generated_video.is_some() {
        request.generated_video = payload.generated_video;
    }
}

fn text<'a>(parts: &'a [FormPart], field: &str) -> Option<&'a str> {
    parts.iter().find_map(|part| match part {
        FormPart::Text { name, value } if name == field => Some(value.as_str()),
        _ => None,
    })
}

fn first_file(parts: Vec<FormPart>) -> Result<UploadedFile, AppError> {
    parts
        .into_iter()
        .find_map(|part| match part {
            FormPart::File { name, file } if name == "file" => Some(file),
            _ => None,
        })
        .ok_or_else(|| AppError::BadRequest("file is required".to_string()))
}

pub fn parse_photo_form(parts: Vec<FormPart>) -> Result<(UploadPhotoModel, UploadedFile), AppError> {
    let model = UploadPhotoModel {
        questionnaire_id: parse_i64(text(&parts, "questionnaire_id")).unwrap_or_default(),
        scene: text(&parts, "scene").unwrap_or_default().to_string(),
        type_photo: text(&parts, "type").unwrap_or_default().to_string(),
    };
    let file = first_file(parts)?;

    Ok((model, file))
}

pub fn parse_video_form(parts: Vec<FormPart>) -> Result<(UploadVideoModel, UploadedFile), AppError> {
    let model = UploadVideoModel {
        questionnaire_id: parse_i64(text(&parts, "questionnaire_id")).unwrap_or_default(),
        type_video: text(&parts, "type").unwrap_or_default().to_string(),
    };
    let file = first_file(parts)?;

    Ok((model, file))
}
