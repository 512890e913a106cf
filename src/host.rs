//! Read-only view of the editor shell that hosts the chat panel.
//!
//! Everything here is implemented by the embedding application. Capture only
//! ever reads through these traits and never mutates host state.

use crate::{
    error::Result,
    types::{CellType, CursorPosition},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An open pane in one of the shell's work areas.
#[derive(Debug, Clone)]
pub enum Pane {
    Document(DocumentHandle),
    /// Terminals, launchers, consoles and anything else not bound to a file
    Other { id: String, label: String },
}

impl Pane {
    pub fn id(&self) -> &str {
        match self {
            Pane::Document(doc) => &doc.id,
            Pane::Other { id, .. } => id,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentHandle> {
        match self {
            Pane::Document(doc) => Some(doc),
            Pane::Other { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentHandle {
    /// Pane identity, used to decide which document is focused
    pub id: String,
    pub path: Option<String>,
    pub kind: DocumentKind,
}

/// Capability-gated view of a document: only editor-backed documents expose a
/// cursor and only notebooks expose cells.
#[derive(Clone)]
pub enum DocumentKind {
    Generic,
    TextEditor(Arc<dyn EditorSurface>),
    Notebook(Arc<dyn NotebookModel>),
}

impl std::fmt::Debug for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Generic => f.write_str("Generic"),
            DocumentKind::TextEditor(_) => f.write_str("TextEditor"),
            DocumentKind::Notebook(_) => f.write_str("Notebook"),
        }
    }
}

pub trait Workbench: Send + Sync {
    /// Panes of the named work area, in the shell's enumeration order
    fn panes(&self, area: &str) -> Vec<Pane>;

    fn current_pane(&self) -> Option<Pane>;
}

pub trait EditorSurface: Send + Sync {
    /// Primary cursor, or `None` when the surface has no readable cursor
    fn cursor(&self) -> Result<Option<CursorPosition>>;
}

/// Read-only copy of one notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub id: String,
    pub cell_type: CellType,
    pub source: String,
    #[serde(default)]
    pub execution_count: Option<u32>,
    #[serde(default)]
    pub output_count: usize,
}

impl CellSnapshot {
    pub fn new(id: impl Into<String>, cell_type: CellType, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cell_type,
            source: source.into(),
            execution_count: None,
            output_count: 0,
        }
    }

    pub fn executed(mut self, execution_count: u32, output_count: usize) -> Self {
        self.execution_count = Some(execution_count);
        self.output_count = output_count;
        self
    }
}

pub trait NotebookModel: Send + Sync {
    /// Number of cells currently rendered
    fn cell_count(&self) -> Result<usize>;

    fn active_cell(&self) -> Result<Option<CellSnapshot>>;

    fn cell_index(&self, cell_id: &str) -> Result<Option<usize>>;
}

/// Content-less storage metadata for one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFileInfo {
    pub path: String,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// Storage format tag, e.g. `notebook`, `file`
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileType {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub mime_types: Vec<String>,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch metadata without the file body
    async fn metadata(&self, path: &str) -> Result<StoredFileInfo>;
}

pub trait FileTypeRegistry: Send + Sync {
    fn file_type(&self, info: &StoredFileInfo) -> Option<FileType>;
}

pub trait ServerConnection: Send + Sync {
    /// Connection root the workspace root is derived from
    fn base_url(&self) -> Result<String>;
}

/// The collaborators a capture reads from.
#[derive(Clone)]
pub struct HostServices {
    pub workbench: Arc<dyn Workbench>,
    pub contents: Arc<dyn ContentStore>,
    pub file_types: Arc<dyn FileTypeRegistry>,
    pub connection: Arc<dyn ServerConnection>,
}

impl HostServices {
    pub fn new(
        workbench: Arc<dyn Workbench>,
        contents: Arc<dyn ContentStore>,
        file_types: Arc<dyn FileTypeRegistry>,
        connection: Arc<dyn ServerConnection>,
    ) -> Self {
        Self {
            workbench,
            contents,
            file_types,
            connection,
        }
    }

    /// One object implementing every collaborator trait.
    pub fn from_single<H>(host: Arc<H>) -> Self
    where
        H: Workbench + ContentStore + FileTypeRegistry + ServerConnection + 'static,
    {
        Self {
            workbench: host.clone(),
            contents: host.clone(),
            file_types: host.clone(),
            connection: host,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
