use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;

use crate::ai::vision::{ImageMime, VisionModel};
use crate::messages::{DOCUMENT_RECEIVED, SEND_AN_IMAGE};
use crate::sheet::SheetSink;

use super::upload::{process_upload, UploadContext};

/// Handle an image sent as a file. Anything that is not a supported image
/// gets a hint to send a picture instead.
pub async fn handle_document<M, S>(
    bot: Bot,
    msg: Message,
    ctx: Arc<UploadContext<M, S>>,
) -> Result<()>
where
    M: VisionModel + 'static,
    S: SheetSink + 'static,
{
    let Some(doc) = msg.document() else {
        return Ok(());
    };

    let declared = doc.mime_type.as_ref().map(|m| m.to_string());
    let Some(mime) = declared.as_deref().and_then(ImageMime::from_mime) else {
        tracing::debug!(mime = ?declared, "document is not a supported image");
        bot.send_message(msg.chat.id, SEND_AN_IMAGE).await?;
        return Ok(());
    };

    let status = bot.send_message(msg.chat.id, DOCUMENT_RECEIVED).await?;
    process_upload(&bot, msg.chat.id, status.id, &ctx, &doc.file.id, mime).await
}
