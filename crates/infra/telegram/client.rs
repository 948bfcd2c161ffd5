use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{
    repositories::notifier::MediaNotifier,
    value_objects::notifications::InlineKeyboardMarkup,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(token: String) -> Self {
        Self {
            token,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: String,
}

/// Bot API client for `sendPhoto` / `sendVideo`. Without a token every send
/// succeeds without touching the network.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    token: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let token = config.token.trim().to_string();
        let token = if token.is_empty() {
            warn!("telegram: token is empty, notifications are disabled");
            None
        } else {
            Some(token)
        };

        let base_url = config.api_base_url.trim();
        let base_url = if base_url.is_empty() {
            DEFAULT_API_BASE_URL
        } else {
            base_url
        };
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).with_context(|| format!("invalid telegram api base url: {base_url}"))?;

        let timeout = if config.timeout.is_zero() {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            config.timeout
        };

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build telegram http client")?;

        Ok(Self {
            token,
            base_url,
            http,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    async fn send_media(
        &self,
        method: &'static str,
        field: &'static str,
        chat_id: i64,
        file_path: &Path,
        caption: String,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let Some(token) = &self.token else {
            debug!(%chat_id, method, "telegram: disabled, skipping send");
            return Ok(());
        };

        if caption.trim().is_empty() {
            bail!("telegram {method}: caption is required");
        }

        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| field.to_string());
        let mime = mime_guess::from_path(file_path).first_or_octet_stream();

        let data = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("read media file {}", file_path.display()))?;

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .context("set media part mime type")?;

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption);

        if let Some(markup) = markup {
            let markup = serde_json::to_string(&markup).context("encode reply markup")?;
            form = form.text("reply_markup", markup);
        }

        let form = form.part(field, part);

        let url = format!("{}/bot{}/{}", self.base_url, token, method);
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| sanitize_reqwest_error(method, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| sanitize_reqwest_error(method, err))?;

        if status.as_u16() >= 400 {
            bail!(
                "telegram {method} failed: status={} body={}",
                status.as_u16(),
                body.trim()
            );
        }

        let decoded: ApiResponse = serde_json::from_str(&body)
            .with_context(|| format!("telegram {method}: decode response"))?;
        if !decoded.ok {
            bail!("telegram {method} error: {}", decoded.description);
        }

        debug!(%chat_id, method, "telegram: media sent");
        Ok(())
    }
}

/// The request URL carries the bot token, so reqwest's own message is dropped.
fn sanitize_reqwest_error(method: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("telegram {method} request timed out");
    }
    if error.is_connect() {
        return anyhow!("telegram {method} connection failed");
    }
    anyhow!("telegram {method} request failed")
}

#[async_trait]
impl MediaNotifier for TelegramClient {
    async fn send_photo(
        &self,
        chat_id: i64,
        file_path: PathBuf,
        caption: String,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.send_media("sendPhoto", "photo", chat_id, &file_path, caption, markup)
            .await
    }

    async fn send_video(
        &self,
        chat_id: i64,
        file_path: PathBuf,
        caption: String,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.send_media("sendVideo", "video", chat_id, &file_path, caption, markup)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::HashMap,
        net::SocketAddr,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        extract::{Multipart, State},
        http::StatusCode,
        response::IntoResponse,
        routing::post,
    };
    use serde_json::json;

    type Captured = Arc<Mutex<Vec<HashMap<String, String>>>>;

    #[derive(Clone)]
    struct FakeApi {
        captured: Captured,
        status: StatusCode,
        body: serde_json::Value,
    }

    async fn capture(State(api): State<FakeApi>, mut multipart: Multipart) -> impl IntoResponse {
        let mut fields = HashMap::new();
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let mime = field.content_type().unwrap_or_default().to_string();
                    let _ = field.bytes().await;
                    fields.insert(format!("{name}.file_name"), file_name);
                    fields.insert(format!("{name}.content_type"), mime);
                }
                None => {
                    fields.insert(name, field.text().await.unwrap_or_default());
                }
            }
        }
        api.captured.lock().unwrap().push(fields);
        (api.status, Json(api.body))
    }

    async fn spawn_api(status: StatusCode, body: serde_json::Value) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route("/botTEST/sendPhoto", post(capture))
            .route("/botTEST/sendVideo", post(capture))
            .with_state(FakeApi {
                captured: Arc::clone(&captured),
                status,
                body,
            });

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/"), captured)
    }

    fn client(base_url: &str, token: &str) -> TelegramClient {
        TelegramClient::new(TelegramConfig {
            token: token.to_string(),
            api_base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn media_file(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, b"media").unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn disabled_client_never_calls_out() {
        let client = client("http://127.0.0.1:1", "   ");
        assert!(!client.is_enabled());

        client
            .send_photo(1, PathBuf::from("/does/not/exist.jpg"), "hi".into(), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_caption_is_rejected() {
        let (base_url, captured) = spawn_api(StatusCode::OK, json!({"ok": true})).await;
        let (_dir, path) = media_file("a.jpg");

        let err = client(&base_url, "TEST")
            .send_photo(1, path, "  ".into(), None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("caption"));
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_photo_as_multipart_with_keyboard() {
        let (base_url, captured) = spawn_api(StatusCode::OK, json!({"ok": true})).await;
        let (_dir, path) = media_file("demo.png");

        client(&base_url, "TEST")
            .send_photo(77, path, "caption".into(), Some(InlineKeyboardMarkup::demo(5)))
            .await
            .unwrap();

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let fields = &captured[0];
        assert_eq!(fields["chat_id"], "77");
        assert_eq!(fields["caption"], "caption");
        assert_eq!(fields["photo.file_name"], "demo.png");
        assert_eq!(fields["photo.content_type"], "image/png");

        let markup: serde_json::Value = serde_json::from_str(&fields["reply_markup"]).unwrap();
        assert_eq!(
            markup["inline_keyboard"][0][0]["callback_data"],
            "payment:yes:5"
        );
    }

    #[tokio::test]
    async fn omits_reply_markup_without_keyboard() {
        let (base_url, captured) = spawn_api(StatusCode::OK, json!({"ok": true})).await;
        let (_dir, path) = media_file("clip.mp4");

        client(&base_url, "TEST")
            .send_video(3, path, "final".into(), None)
            .await
            .unwrap();

        let captured = captured.lock().unwrap();
        assert!(!captured[0].contains_key("reply_markup"));
        assert_eq!(captured[0]["video.file_name"], "clip.mp4");
    }

    #[tokio::test]
    async fn http_error_status_becomes_error() {
        let (base_url, _) =
            spawn_api(StatusCode::INTERNAL_SERVER_ERROR, json!({"ok": false})).await;
        let (_dir, path) = media_file("a.jpg");

        let err = client(&base_url, "TEST")
            .send_photo(1, path, "c".into(), None)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"telegram sendPhoto failed: status=500 body={"ok":false}"#
        );
    }

    #[tokio::test]
    async fn api_not_ok_becomes_error() {
        let (base_url, _) = spawn_api(
            StatusCode::OK,
            json!({"ok": false, "description": "Bad Request: chat not found"}),
        )
        .await;
        let (_dir, path) = media_file("clip.mp4");

        let err = client(&base_url, "TEST")
            .send_video(1, path, "c".into(), None)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "telegram sendVideo error: Bad Request: chat not found"
        );
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let result = TelegramClient::new(TelegramConfig {
            token: "x".into(),
            api_base_url: "not a url".into(),
            timeout: Duration::from_secs(1),
        });
        assert!(result.is_err());
    }
}
