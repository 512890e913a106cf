//! In-memory host described as JSON.
//!
//! Lets the capture pipeline run outside a real editor shell: the CLI feeds
//! it from a file and the test suites build it in code. Failure flags make
//! every degradation path reachable.

use crate::{
    context::language::extension,
    error::{ContextError, Result},
    host::{
        CellSnapshot, ContentStore, DocumentHandle, DocumentKind, EditorSurface, FileType,
        FileTypeRegistry, NotebookModel, Pane, ServerConnection, StoredFileInfo, Workbench,
    },
    types::CursorPosition,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureHost {
    /// `None` makes the connection accessor fail
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_area")]
    pub area: String,
    #[serde(default)]
    pub panes: Vec<FixturePane>,
    /// Pane id of the focused pane
    #[serde(default)]
    pub focused: Option<String>,
    #[serde(default)]
    pub file_types: Vec<FileType>,
}

fn default_area() -> String {
    "main".to_string()
}

impl Default for FixtureHost {
    fn default() -> Self {
        Self {
            base_url: None,
            area: default_area(),
            panes: Vec::new(),
            focused: None,
            file_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "pane", rename_all = "snake_case")]
pub enum FixturePane {
    Document(FixtureDocument),
    Other { id: String, label: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDocument {
    /// Defaults to the path
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub kind: FixtureKind,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub fail_storage: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixtureKind {
    #[default]
    Generic,
    TextEditor {
        #[serde(default)]
        cursor: Option<CursorPosition>,
        #[serde(default)]
        fail_cursor: bool,
    },
    Notebook(FixtureNotebook),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureNotebook {
    #[serde(default)]
    pub cells: Vec<CellSnapshot>,
    /// Index of the focused cell
    #[serde(default)]
    pub active: Option<usize>,
    #[serde(default)]
    pub fail: bool,
}

impl FixtureHost {
    /// All documents in the main area, nothing focused.
    pub fn new(base_url: impl Into<String>, documents: Vec<FixtureDocument>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            area: default_area(),
            panes: documents.into_iter().map(FixturePane::Document).collect(),
            focused: None,
            file_types: Vec::new(),
        }
    }

    pub fn with_focus(mut self, pane_id: impl Into<String>) -> Self {
        self.focused = Some(pane_id.into());
        self
    }

    pub fn with_pane(mut self, pane: FixturePane) -> Self {
        self.panes.push(pane);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await.map_err(|e| {
            ContextError::Fixture(format!(
                "Failed to read fixture {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    fn documents(&self) -> impl Iterator<Item = &FixtureDocument> {
        self.panes.iter().filter_map(|pane| match pane {
            FixturePane::Document(doc) => Some(doc),
            FixturePane::Other { .. } => None,
        })
    }
}

impl FixturePane {
    fn id(&self) -> String {
        match self {
            FixturePane::Document(doc) => doc.pane_id(),
            FixturePane::Other { id, .. } => id.clone(),
        }
    }

    fn to_pane(&self) -> Pane {
        match self {
            FixturePane::Document(doc) => Pane::Document(doc.to_handle()),
            FixturePane::Other { id, label } => Pane::Other {
                id: id.clone(),
                label: label.clone(),
            },
        }
    }
}

impl FixtureDocument {
    pub fn new(path: impl Into<String>, kind: FixtureKind) -> Self {
        Self {
            id: None,
            path: Some(path.into()),
            kind,
            mimetype: None,
            size: None,
            fail_storage: false,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    pub fn failing_storage(mut self) -> Self {
        self.fail_storage = true;
        self
    }

    pub fn pane_id(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.path.clone())
            .unwrap_or_default()
    }

    fn to_handle(&self) -> DocumentHandle {
        let kind = match &self.kind {
            FixtureKind::Generic => DocumentKind::Generic,
            FixtureKind::TextEditor { cursor, fail_cursor } => {
                DocumentKind::TextEditor(Arc::new(FixtureEditor {
                    cursor: *cursor,
                    fail: *fail_cursor,
                }))
            }
            FixtureKind::Notebook(notebook) => DocumentKind::Notebook(Arc::new(notebook.clone())),
        };

        DocumentHandle {
            id: self.pane_id(),
            path: self.path.clone(),
            kind,
        }
    }
}

struct FixtureEditor {
    cursor: Option<CursorPosition>,
    fail: bool,
}

impl EditorSurface for FixtureEditor {
    fn cursor(&self) -> Result<Option<CursorPosition>> {
        if self.fail {
            return Err(ContextError::Editor("cursor unavailable".to_string()));
        }
        Ok(self.cursor)
    }
}

impl FixtureNotebook {
    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(ContextError::Notebook("notebook model unavailable".to_string()));
        }
        Ok(())
    }
}

impl NotebookModel for FixtureNotebook {
    fn cell_count(&self) -> Result<usize> {
        self.check()?;
        Ok(self.cells.len())
    }

    fn active_cell(&self) -> Result<Option<CellSnapshot>> {
        self.check()?;
        Ok(self.active.and_then(|index| self.cells.get(index)).cloned())
    }

    fn cell_index(&self, cell_id: &str) -> Result<Option<usize>> {
        self.check()?;
        Ok(self.cells.iter().position(|cell| cell.id == cell_id))
    }
}

impl Workbench for FixtureHost {
    fn panes(&self, area: &str) -> Vec<Pane> {
        if area != self.area {
            return Vec::new();
        }
        self.panes.iter().map(FixturePane::to_pane).collect()
    }

    fn current_pane(&self) -> Option<Pane> {
        let focused = self.focused.as_deref()?;
        self.panes
            .iter()
            .find(|pane| pane.id() == focused)
            .map(FixturePane::to_pane)
    }
}

#[async_trait]
impl ContentStore for FixtureHost {
    async fn metadata(&self, path: &str) -> Result<StoredFileInfo> {
        let doc = self
            .documents()
            .find(|doc| doc.path.as_deref() == Some(path))
            .ok_or_else(|| ContextError::storage(path, "No such file or directory"))?;

        if doc.fail_storage {
            return Err(ContextError::storage(path, "Permission denied"));
        }

        let format = match doc.kind {
            FixtureKind::Notebook(_) => "notebook",
            _ => "file",
        };

        Ok(StoredFileInfo {
            path: path.to_string(),
            mimetype: doc.mimetype.clone(),
            size: doc.size,
            format: Some(format.to_string()),
        })
    }
}

impl FileTypeRegistry for FixtureHost {
    fn file_type(&self, info: &StoredFileInfo) -> Option<FileType> {
        let ext = extension(&info.path).map(str::to_lowercase);
        let matched = self.file_types.iter().find(|file_type| {
            let by_extension = ext.as_deref().is_some_and(|ext| {
                file_type
                    .extensions
                    .iter()
                    .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
            });
            let by_mime = info
                .mimetype
                .as_ref()
                .is_some_and(|mime| file_type.mime_types.contains(mime));
            by_extension || by_mime
        });

        Some(matched.cloned().unwrap_or_else(|| FileType {
            name: "text".to_string(),
            extensions: Vec::new(),
            mime_types: Vec::new(),
        }))
    }
}

impl ServerConnection for FixtureHost {
    fn base_url(&self) -> Result<String> {
        self.base_url
            .clone()
            .ok_or_else(|| ContextError::Connection("no base address configured".to_string()))
    }
}
