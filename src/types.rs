use serde::{Deserialize, Deserializer, Serialize};

/// Point-in-time bundle of what the user is looking at, attached to one
/// outgoing chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    #[serde(
        rename = "activeFile",
        alias = "activeDocument",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub active_document: Option<DocumentMetadata>,
    #[serde(rename = "openTabs", alias = "openDocuments", default)]
    pub open_documents: Vec<DocumentMetadata>,
    #[serde(rename = "workspaceRoot", default)]
    pub workspace_root: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ContextSnapshot {
    /// True when there is nothing worth sending to the backend.
    pub fn is_empty(&self) -> bool {
        self.active_document.is_none() && self.open_documents.is_empty()
    }

    pub fn non_active_documents(&self) -> impl Iterator<Item = &DocumentMetadata> {
        self.open_documents.iter().filter(|doc| !doc.is_active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub path: String,
    pub relative_path: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_position: Option<CursorPosition>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_notebook: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_cell: Option<CellMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cells: Option<usize>,
}

/// Zero-based position of the primary cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Code => "code",
            CellType::Markdown => "markdown",
            CellType::Raw => "raw",
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentinel stored in `cell_index` when the active cell id is missing from
/// the notebook's cell list.
pub const CELL_INDEX_NOT_FOUND: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMetadata {
    pub cell_id: String,
    /// Zero-based, or [`CELL_INDEX_NOT_FOUND`]
    pub cell_index: i64,
    pub cell_type: CellType,
    pub source: String,
    /// Code cells only. `Some(None)` is a code cell that never ran and is
    /// written out as an explicit `null`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_count: Option<Option<u32>>,
    /// Code cells only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_output: Option<bool>,
}

// A key that is present maps to `Some`, even when its value is `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
