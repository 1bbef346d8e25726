//! In-memory stand-ins for the vision model and the spreadsheet.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ai::vision::{ImageMime, VisionModel, VisionRequest};
use crate::error::{ModelError, SheetError};
use crate::normalize::Cell;
use crate::sheet::SheetSink;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What the scripted model was asked last.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub mime: ImageMime,
    pub prompt: String,
    pub max_tokens: u32,
    pub image_len: usize,
}

#[derive(Default)]
struct ModelState {
    calls: usize,
    last: Option<SeenRequest>,
}

/// Returns a fixed reply, or [`ModelError::EmptyReply`] when built with
/// [`ScriptedModel::failing`].
#[derive(Clone, Default)]
pub struct ScriptedModel {
    reply: Option<String>,
    state: Arc<Mutex<ModelState>>,
}

impl ScriptedModel {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        lock(&self.state).calls
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        lock(&self.state).last.clone()
    }
}

impl VisionModel for ScriptedModel {
    async fn complete(&self, request: VisionRequest<'_>) -> Result<String, ModelError> {
        {
            let mut state = lock(&self.state);
            state.calls += 1;
            state.last = Some(SeenRequest {
                mime: request.mime,
                prompt: request.prompt.to_string(),
                max_tokens: request.max_tokens,
                image_len: request.image.len(),
            });
        }
        self.reply.clone().ok_or(ModelError::EmptyReply)
    }
}

#[derive(Default)]
struct SheetState {
    rows: Vec<Vec<String>>,
    inserts: usize,
    appends: usize,
}

/// A sheet held in memory. Cells are stored as the text the sheet would show.
#[derive(Clone, Default)]
pub struct MemorySheet {
    state: Arc<Mutex<SheetState>>,
    fail: bool,
}

impl MemorySheet {
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        let sheet = Self::default();
        lock(&sheet.state).rows = rows;
        sheet
    }

    /// Every call fails with [`SheetError::MissingSheet`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        lock(&self.state).rows.clone()
    }

    pub fn inserts(&self) -> usize {
        lock(&self.state).inserts
    }

    pub fn appends(&self) -> usize {
        lock(&self.state).appends
    }

    fn check(&self) -> Result<(), SheetError> {
        if self.fail {
            Err(SheetError::MissingSheet("memory".into()))
        } else {
            Ok(())
        }
    }
}

impl SheetSink for MemorySheet {
    async fn first_row(&self) -> Result<Vec<String>, SheetError> {
        self.check()?;
        Ok(lock(&self.state).rows.first().cloned().unwrap_or_default())
    }

    async fn insert_first_row(&self, row: &[String]) -> Result<(), SheetError> {
        self.check()?;
        let mut state = lock(&self.state);
        state.rows.insert(0, row.to_vec());
        state.inserts += 1;
        Ok(())
    }

    async fn append_rows(&self, rows: &[Vec<Cell>]) -> Result<(), SheetError> {
        self.check()?;
        let mut state = lock(&self.state);
        state
            .rows
            .extend(rows.iter().map(|r| r.iter().map(Cell::to_string).collect()));
        state.appends += 1;
        Ok(())
    }
}
