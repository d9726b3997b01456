//! Model catalog: the list of prediction models fetched from the backend,
//! and the selection within it.

mod key;

pub use key::ModelKey;

use serde::Serialize;

use crate::api::{ApiError, ModelDescriptor};

/// The in-memory model catalog.
///
/// Replaced wholesale on every fetch; a failed or empty fetch leaves it
/// empty with nothing selected.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    models: Vec<ModelDescriptor>,
    selected: Option<usize>,
    notice: Option<CatalogNotice>,
}

/// Why the catalog shows no entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum CatalogNotice {
    /// The backend returned an empty list.
    Empty,
    /// The fetch failed or returned something other than a list.
    Error(String),
}

/// What happened when a fetch result was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    Loaded(usize),
    Empty,
    Failed(ApiError),
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fetch result. On success with at least one model the first
    /// entry is selected.
    pub fn apply(&mut self, result: Result<Vec<ModelDescriptor>, ApiError>) -> CatalogOutcome {
        self.models.clear();
        self.selected = None;

        match result {
            Ok(models) if models.is_empty() => {
                self.notice = Some(CatalogNotice::Empty);
                CatalogOutcome::Empty
            }
            Ok(models) => {
                let count = models.len();
                self.models = models;
                self.selected = Some(0);
                self.notice = None;
                CatalogOutcome::Loaded(count)
            }
            Err(err) => {
                self.notice = Some(CatalogNotice::Error("Could not load models".to_string()));
                CatalogOutcome::Failed(err)
            }
        }
    }

    /// Replace the catalog with a single descriptor fetched on its own,
    /// and select it.
    pub fn set_single(&mut self, descriptor: ModelDescriptor) {
        self.models = vec![descriptor];
        self.selected = Some(0);
        self.notice = None;
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn get(&self, index: usize) -> Option<&ModelDescriptor> {
        self.models.get(index)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.models.iter().position(|m| m.key == key)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&ModelDescriptor> {
        self.selected.and_then(|i| self.models.get(i))
    }

    /// Select the entry at `index`. Out-of-range indexes leave the
    /// selection unchanged and return `None`.
    pub fn select(&mut self, index: usize) -> Option<&ModelDescriptor> {
        if index >= self.models.len() {
            return None;
        }
        self.selected = Some(index);
        self.models.get(index)
    }

    pub fn notice(&self) -> Option<&CatalogNotice> {
        self.notice.as_ref()
    }

    /// Render the list panel.
    pub fn view(&self) -> CatalogView {
        CatalogView {
            entries: self
                .models
                .iter()
                .enumerate()
                .map(|(index, model)| CatalogEntry {
                    index,
                    key: model.key.clone(),
                    name: model.name.clone(),
                    task: model.task.clone(),
                    active: self.selected == Some(index),
                })
                .collect(),
            selected: self.selected,
            notice: self.notice.clone(),
        }
    }
}

/// The model list panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub entries: Vec<CatalogEntry>,
    pub selected: Option<usize>,
    pub notice: Option<CatalogNotice>,
}

/// One selectable entry in the model list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub index: usize,
    pub key: String,
    pub name: String,
    pub task: String,
    pub active: bool,
}

/// The model info panel shown for the selected model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfoView {
    pub name: String,
    pub description: String,
    pub task: String,
    pub target: String,
    pub key: String,
    /// Example voice commands; empty hides the section.
    pub voice_commands: Vec<String>,
}

impl From<&ModelDescriptor> for ModelInfoView {
    fn from(model: &ModelDescriptor) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            task: model.task.clone(),
            target: model.target.clone(),
            key: model.key.clone(),
            voice_commands: model.voice_commands.clone(),
        }
    }
}
