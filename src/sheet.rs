//! Destination sheet: header contract and append-only writes.

pub mod google;

use std::future::Future;

use tracing::{debug, info, instrument};

use crate::error::SheetError;
use crate::normalize::{CanonicalRow, Cell};
use crate::schema::SchemaVersion;

pub use google::GoogleSheetsSink;

/// An append-only table addressed by the deployment's sheet id.
pub trait SheetSink: Send + Sync {
    /// Values of the first row; empty when the sheet is empty.
    fn first_row(&self) -> impl Future<Output = Result<Vec<String>, SheetError>> + Send;

    /// Insert `row` above the current first row.
    fn insert_first_row(
        &self,
        row: &[String],
    ) -> impl Future<Output = Result<(), SheetError>> + Send;

    /// Append all rows after the last row, as one batch.
    fn append_rows(
        &self,
        rows: &[Vec<Cell>],
    ) -> impl Future<Output = Result<(), SheetError>> + Send;
}

pub struct SheetWriter<S> {
    sink: S,
    schema: SchemaVersion,
}

impl<S: SheetSink> SheetWriter<S> {
    pub fn new(sink: S, schema: SchemaVersion) -> Self {
        Self { sink, schema }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Make the first row equal the header contract. Returns `true` when a
    /// header row was inserted. Existing rows are never rewritten.
    #[instrument(level = "debug", skip(self), fields(schema = %self.schema))]
    pub async fn ensure_headers(&self) -> Result<bool, SheetError> {
        let header = self.schema.header_row();
        let first = self.sink.first_row().await?;
        if first == header {
            debug!("header row already matches");
            return Ok(false);
        }
        debug!(found = ?first, "header row differs, inserting contract row");
        self.sink.insert_first_row(&header).await?;
        Ok(true)
    }

    /// Append rows in order and return how many were written.
    #[instrument(level = "debug", skip(self, rows), fields(count = rows.len()))]
    pub async fn append(&self, rows: Vec<CanonicalRow>) -> Result<usize, SheetError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let cells: Vec<Vec<Cell>> = rows.into_iter().map(CanonicalRow::into_cells).collect();
        self.sink.append_rows(&cells).await?;
        info!(count = cells.len(), "appended rows");
        Ok(cells.len())
    }

    /// Header check followed by the append.
    pub async fn write(&self, rows: Vec<CanonicalRow>) -> Result<usize, SheetError> {
        self.ensure_headers().await?;
        self.append(rows).await
    }
}
