use std::collections::VecDeque;

use bytes::Bytes;
use serde::Deserialize;

pub const PHOTOS_FOLDER: &str = "photos";
pub const VIDEOS_FOLDER: &str = "videos";

pub const FALLBACK_EXT: &str = ".bin";

pub const SCENE_DEFAULT: &str = "send";
pub const SCENE_RESULT: &str = "result";
pub const SCENE_DELIVERY: &str = "delivery";
pub const SCENE_DEMO: &str = "demo";

const CANONICAL_VIDEO_EXTS: [&str; 9] = [
    ".mp4", ".mov", ".avi", ".mkv", ".webm", ".m4v", ".mpg", ".mpeg", ".3gp",
];

/// A file part received over HTTP, fully buffered.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn photo_ext(&self) -> &'static str {
        normalize_photo_ext(&self.file_name)
    }

    /// Extension from the file name, or from the content type when the name
    /// says nothing useful.
    pub fn video_ext(&self) -> String {
        video_ext_with_fallback(&self.file_name, self.content_type.as_deref())
    }
}

pub fn normalize_photo_ext(file_name: &str) -> &'static str {
    let ext = path_ext(file_name.trim()).to_ascii_lowercase();
    match ext.as_str() {
        ".jpg" | ".jpeg" => ".jpg",
        ".png" => ".png",
        ".webp" => ".webp",
        _ => FALLBACK_EXT,
    }
}

/// Maps a file name, bare extension or MIME type to one of the canonical
/// video extensions, or [`FALLBACK_EXT`].
pub fn normalize_video_ext(name: &str) -> String {
    let mut name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return FALLBACK_EXT.to_string();
    }

    if let Some(idx) = name.find(['?', '#']) {
        name = name[..idx].trim().to_string();
    }

    if let Some(ext) = canonical_video_ext(&path_ext(&name)) {
        return ext;
    }

    if !name.contains(['.', '/']) {
        if let Some(ext) = canonical_video_ext(&format!(".{name}")) {
            return ext;
        }
    }

    if let Some((_, subtype)) = name.rsplit_once('/') {
        let subtype = subtype.split(';').next().unwrap_or_default().trim();
        if !subtype.is_empty() {
            let candidate = format!(".{}", subtype.trim_start_matches('.'));
            if let Some(ext) = canonical_video_ext(&candidate) {
                return ext;
            }
        }
    }

    FALLBACK_EXT.to_string()
}

pub fn video_ext_with_fallback(file_name: &str, content_type: Option<&str>) -> String {
    let ext = normalize_video_ext(file_name);
    if ext != FALLBACK_EXT {
        return ext;
    }

    match content_type.map(normalize_video_ext) {
        Some(alt) if alt != FALLBACK_EXT => alt,
        _ => ext,
    }
}

fn canonical_video_ext(ext: &str) -> Option<String> {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.is_empty() {
        return None;
    }
    let ext = if ext.starts_with('.') { ext } else { format!(".{ext}") };

    CANONICAL_VIDEO_EXTS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Suffix of the last path component from its final dot, or "". A
/// dot-leading name like `.mp4` is all extension.
fn path_ext(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    last.rsplit_once('.')
        .map(|(_, ext)| format!(".{ext}"))
        .unwrap_or_default()
}

/// Scene labels handed out to final photos in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneQueue(VecDeque<String>);

impl SceneQueue {
    pub fn push(&mut self, scene: impl Into<String>) {
        self.0.push_back(scene.into());
    }

    /// Next queued scene; an exhausted queue or a blank entry yields
    /// [`SCENE_DEFAULT`].
    pub fn pop(&mut self) -> String {
        match self.0.pop_front() {
            Some(scene) if !scene.trim().is_empty() => scene.trim().to_string(),
            _ => SCENE_DEFAULT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinalPhotoRef {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub scene: String,
    #[serde(default, alias = "type")]
    pub type_photo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratedVideoRef {
    #[serde(default)]
    pub path: String,
    #[serde(default, alias = "type")]
    pub type_video: String,
}

/// Media already in storage, referenced by relative path. This is the JSON
/// body of `POST /api/questionnaires/media` and the `payload` multipart field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmitMediaRequest {
    #[serde(default)]
    pub questionnaire_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub demo_photos: Vec<String>,
    #[serde(default)]
    pub final_photos: Vec<FinalPhotoRef>,
    #[serde(default)]
    pub demo_video: String,
    #[serde(default)]
    pub generated_video: Option<GeneratedVideoRef>,
}

/// Files uploaded with a media submission. Final photos take their scenes
/// from `final_photo_scenes` in upload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaUploads {
    pub demo_photos: Vec<UploadedFile>,
    pub final_photos: Vec<UploadedFile>,
    pub demo_video: Option<UploadedFile>,
    pub generated_video: Option<UploadedFile>,
    pub delivery_photo: Option<UploadedFile>,
    pub final_photo_scenes: SceneQueue,
}
