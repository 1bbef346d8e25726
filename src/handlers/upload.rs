use anyhow::Result;
use chrono::Local;
use teloxide::{
    prelude::*,
    types::{ChatId, MessageId},
};

use crate::ai::vision::{ImageMime, VisionModel};
use crate::ai::AnthropicClient;
use crate::error::ProcessError;
use crate::messages::{
    error_text, rows_found_text, rows_written_text, MALFORMED_REPLY, NO_ROWS_FOUND, RECOGNIZING,
};
use crate::service::{Outcome, PriceService};
use crate::sheet::{GoogleSheetsSink, SheetSink};
use crate::utils::{download_telegram_file, try_edit_message};

/// Everything an upload handler needs, shared across updates.
pub struct UploadContext<M, S> {
    pub service: PriceService<M, S>,
    pub sheet_name: String,
}

impl<M, S> UploadContext<M, S> {
    pub fn new(service: PriceService<M, S>, sheet_name: impl Into<String>) -> Self {
        Self {
            service,
            sheet_name: sheet_name.into(),
        }
    }
}

pub type AppContext = UploadContext<AnthropicClient, GoogleSheetsSink>;

async fn report_failure(bot: &Bot, chat_id: ChatId, status: MessageId, err: &ProcessError) {
    let text = if err.is_malformed() {
        tracing::warn!(error = %err, chat_id = chat_id.0, "Model reply could not be parsed");
        MALFORMED_REPLY.to_string()
    } else {
        tracing::error!(error = %err, chat_id = chat_id.0, "Price list processing failed");
        error_text(err)
    };
    try_edit_message(bot, chat_id, status, text).await;
}

/// Download one image and run it through extraction and the sheet, editing
/// the `status` message as each step finishes.
///
/// Failures are reported to the chat and logged; they never fail the handler,
/// so one bad image does not affect the next update.
pub async fn process_upload<M: VisionModel, S: SheetSink>(
    bot: &Bot,
    chat_id: ChatId,
    status: MessageId,
    ctx: &UploadContext<M, S>,
    file_id: &str,
    mime: ImageMime,
) -> Result<()> {
    let bytes = match download_telegram_file(bot, file_id).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, chat_id = chat_id.0, "Failed to download image");
            try_edit_message(bot, chat_id, status, error_text(&err)).await;
            return Ok(());
        }
    };

    try_edit_message(bot, chat_id, status, RECOGNIZING).await;

    let today = Local::now().date_naive();
    let outcome = ctx
        .service
        .process(&bytes, mime, today, |count| {
            try_edit_message(bot, chat_id, status, rows_found_text(count))
        })
        .await;

    match outcome {
        Ok(Outcome::Empty) => {
            tracing::info!(chat_id = chat_id.0, "No rows found in price list");
            try_edit_message(bot, chat_id, status, NO_ROWS_FOUND).await;
        }
        Ok(Outcome::Written { count }) => {
            tracing::info!(
                "Added {} row(s) from price list for chat {}",
                count,
                chat_id
            );
            try_edit_message(
                bot,
                chat_id,
                status,
                rows_written_text(count, &ctx.sheet_name),
            )
            .await;
        }
        Err(err) => report_failure(bot, chat_id, status, &err).await,
    }

    Ok(())
}
