use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

pub mod ai;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod messages;
pub mod normalize;
pub mod pricing;
pub mod schema;
pub mod service;
pub mod sheet;
mod utils;

pub use commands::Command;
pub use config::{Config, SheetsConfig};
pub use error::{ExtractionError, ModelError, ProcessError, SheetError};
pub use extract::{parse_records, unwrap_payload, Extractor};
pub use handlers::{handle_document, handle_photo, help, AppContext, UploadContext};
pub use normalize::{derive_model_year, CanonicalRow, Cell, Field, Normalizer, RawRecord};
pub use pricing::{parse_price, MarkupPolicy, Rounding};
pub use schema::SchemaVersion;
pub use service::{Outcome, PriceService};
pub use sheet::{GoogleSheetsSink, SheetSink, SheetWriter};

/// Message routing: commands, then photos, then documents. Upload handlers
/// expect an `Arc<AppContext>` dependency.
pub fn update_handler() -> teloxide::dispatching::UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(|bot: Bot, msg: Message, cmd: Command| async move {
                    cmd.dispatch(bot, msg).await
                }),
        )
        .branch(
            dptree::entry()
                .filter(|msg: Message| msg.photo().is_some())
                .endpoint(handle_photo::<ai::AnthropicClient, GoogleSheetsSink>),
        )
        .branch(
            dptree::entry()
                .filter(|msg: Message| msg.document().is_some())
                .endpoint(handle_document::<ai::AnthropicClient, GoogleSheetsSink>),
        )
}

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting price list bot...");

    let config = Config::from_env()?;
    tracing::info!(
        schema = %config.schema,
        markup_percent = config.markup.percent,
        rounding = %config.markup.rounding,
        sheet = %config.sheets.sheet_name,
        "Loaded configuration"
    );

    let bot = Bot::new(&config.telegram_token);
    let sink = GoogleSheetsSink::from_config(&config.sheets).await?;
    let model = ai::AnthropicClient::new(&config.ai);
    tracing::info!(model = %model.model(), "Vision model configured");

    let service = PriceService::new(model, sink, config.schema, config.markup);
    let ctx: Arc<AppContext> = Arc::new(UploadContext::new(
        service,
        config.sheets.sheet_name.clone(),
    ));

    // --- Dispatcher ---
    Dispatcher::builder(bot, update_handler())
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
