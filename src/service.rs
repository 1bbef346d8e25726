//! One upload, end to end: extract, normalize, write.

use std::future::Future;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::ai::vision::{ImageMime, VisionModel};
use crate::error::ProcessError;
use crate::extract::Extractor;
use crate::normalize::{Normalizer, RawRecord};
use crate::pricing::MarkupPolicy;
use crate::schema::SchemaVersion;
use crate::sheet::{SheetSink, SheetWriter};

/// What happened to one uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The model found no rows; nothing was written.
    Empty,
    Written { count: usize },
}

pub struct PriceService<M, S> {
    extractor: Extractor<M>,
    normalizer: Normalizer,
    writer: SheetWriter<S>,
}

impl<M: VisionModel, S: SheetSink> PriceService<M, S> {
    pub fn new(model: M, sink: S, schema: SchemaVersion, markup: MarkupPolicy) -> Self {
        Self {
            extractor: Extractor::new(model, schema),
            normalizer: Normalizer::new(schema, markup),
            writer: SheetWriter::new(sink, schema),
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.extractor.schema()
    }

    pub fn writer(&self) -> &SheetWriter<S> {
        &self.writer
    }

    pub async fn extract(
        &self,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<Vec<RawRecord>, ProcessError> {
        Ok(self.extractor.extract(image, mime).await?)
    }

    /// Normalize every record, then write the whole batch after the header check.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub async fn store(
        &self,
        records: &[RawRecord],
        today: NaiveDate,
    ) -> Result<usize, ProcessError> {
        let rows = self.normalizer.normalize_all(records, today);
        Ok(self.writer.write(rows).await?)
    }

    /// Extract and store one image. `on_found` runs with the row count once
    /// extraction succeeds with at least one row, before anything is written.
    pub async fn process<F, Fut>(
        &self,
        image: &[u8],
        mime: ImageMime,
        today: NaiveDate,
        on_found: F,
    ) -> Result<Outcome, ProcessError>
    where
        F: FnOnce(usize) -> Fut,
        Fut: Future<Output = ()>,
    {
        let records = self.extract(image, mime).await?;
        if records.is_empty() {
            info!("no rows found in image");
            return Ok(Outcome::Empty);
        }
        on_found(records.len()).await;
        let count = self.store(&records, today).await?;
        Ok(Outcome::Written { count })
    }
}
