//! Price-list extraction: prompt, one model call, unwrap, parse.

pub mod unwrap;

use tracing::{debug, info, instrument, warn};

use crate::ai::vision::{ImageMime, VisionModel, VisionRequest};
use crate::error::ExtractionError;
use crate::normalize::RawRecord;
use crate::schema::SchemaVersion;

pub use unwrap::unwrap_payload;

/// Parse an unwrapped reply as a JSON array of objects.
pub fn parse_records(payload: &str) -> Result<Vec<RawRecord>, ExtractionError> {
    serde_json::from_str::<Vec<RawRecord>>(payload).map_err(|source| {
        warn!(error = %source, "model reply is not a row array");
        ExtractionError::Malformed {
            payload: payload.to_string(),
            source,
        }
    })
}

/// Runs extractions against one model for one schema generation.
pub struct Extractor<M> {
    model: M,
    schema: SchemaVersion,
}

impl<M: VisionModel> Extractor<M> {
    pub fn new(model: M, schema: SchemaVersion) -> Self {
        Self { model, schema }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Extract every row from one image. An empty vector means the model
    /// found no rows, which is not an error.
    #[instrument(
        level = "debug",
        skip(self, image),
        fields(size = image.len(), schema = %self.schema)
    )]
    pub async fn extract(
        &self,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<Vec<RawRecord>, ExtractionError> {
        let request = VisionRequest {
            image,
            mime,
            prompt: self.schema.prompt(),
            max_tokens: self.schema.max_tokens(),
        };
        let reply = self.model.complete(request).await?;
        debug!(len = reply.len(), "received model reply");

        let payload = unwrap_payload(&reply);
        let records = parse_records(payload)?;
        info!(count = records.len(), "extracted price rows");
        Ok(records)
    }
}
