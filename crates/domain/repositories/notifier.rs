use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::notifications::InlineKeyboardMarkup;

/// Delivers media files to an end user's chat.
#[automock]
#[async_trait]
pub trait MediaNotifier {
    async fn send_photo(
        &self,
        chat_id: i64,
        file_path: PathBuf,
        caption: String,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;
    async fn send_video(
        &self,
        chat_id: i64,
        file_path: PathBuf,
        caption: String,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;
}
