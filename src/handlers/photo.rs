use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;

use crate::ai::vision::{ImageMime, VisionModel};
use crate::messages::PHOTO_RECEIVED;
use crate::sheet::SheetSink;

use super::upload::{process_upload, UploadContext};

/// Handle a compressed Telegram photo. The largest size is used; Telegram
/// always re-encodes photos as JPEG.
pub async fn handle_photo<M, S>(
    bot: Bot,
    msg: Message,
    ctx: Arc<UploadContext<M, S>>,
) -> Result<()>
where
    M: VisionModel + 'static,
    S: SheetSink + 'static,
{
    let Some(file_id) = msg
        .photo()
        .and_then(|sizes| sizes.iter().max_by_key(|p| p.file.size))
        .map(|p| p.file.id.clone())
    else {
        tracing::debug!("photo had no usable sizes");
        return Ok(());
    };

    let status = bot.send_message(msg.chat.id, PHOTO_RECEIVED).await?;
    process_upload(&bot, msg.chat.id, status.id, &ctx, &file_id, ImageMime::Jpeg).await
}
