use std::path::PathBuf;

use anyhow::{Context, Result};
use crates::domain::{
    repositories::notifier::MediaNotifier,
    value_objects::notifications::{DEMO_CAPTION, FINAL_CAPTION, InlineKeyboardMarkup},
};
use tracing::info;

/// Sends demo photos and an optional demo video. The payment keyboard rides
/// on the last message of the batch.
pub async fn send_demo_media<N>(
    notifier: &N,
    chat_id: i64,
    questionnaire_id: i64,
    photos: &[PathBuf],
    video: Option<PathBuf>,
) -> Result<()>
where
    N: MediaNotifier + Send + Sync + ?Sized,
{
    if photos.is_empty() && video.is_none() {
        return Ok(());
    }

    info!(
        %chat_id,
        %questionnaire_id,
        photos = photos.len(),
        has_video = video.is_some(),
        "media_delivery: sending demo media"
    );

    let markup = InlineKeyboardMarkup::demo(questionnaire_id);
    let last_photo = photos.len().checked_sub(1);

    for (idx, photo) in photos.iter().enumerate() {
        let photo_markup = (video.is_none() && Some(idx) == last_photo).then(|| markup.clone());
        notifier
            .send_photo(chat_id, photo.clone(), DEMO_CAPTION.to_string(), photo_markup)
            .await
            .with_context(|| format!("send demo photo {}", photo.display()))?;
    }

    if let Some(video) = video {
        notifier
            .send_video(chat_id, video.clone(), DEMO_CAPTION.to_string(), Some(markup))
            .await
            .with_context(|| format!("send demo video {}", video.display()))?;
    }

    Ok(())
}

/// Sends the finished photos, then the video with the delivery keyboard.
pub async fn send_final_media<N>(
    notifier: &N,
    chat_id: i64,
    questionnaire_id: i64,
    photos: &[PathBuf],
    video: PathBuf,
) -> Result<()>
where
    N: MediaNotifier + Send + Sync + ?Sized,
{
    info!(
        %chat_id,
        %questionnaire_id,
        photos = photos.len(),
        "media_delivery: sending final media"
    );

    for photo in photos {
        notifier
            .send_photo(chat_id, photo.clone(), FINAL_CAPTION.to_string(), None)
            .await
            .with_context(|| format!("send final photo {}", photo.display()))?;
    }

    notifier
        .send_video(
            chat_id,
            video.clone(),
            FINAL_CAPTION.to_string(),
            Some(InlineKeyboardMarkup::delivery(questionnaire_id)),
        )
        .await
        .with_context(|| format!("send final video {}", video.display()))?;

    Ok(())
}
