//! Active cell introspection for notebook documents

use crate::{
    config::TruncationConfig,
    error::Result,
    host::{DocumentHandle, DocumentKind, NotebookModel},
    types::{CELL_INDEX_NOT_FOUND, CellMetadata, CellType},
};

#[derive(Debug, Clone, PartialEq)]
pub struct NotebookInspection {
    pub active_cell: Option<CellMetadata>,
    pub total_cells: usize,
}

/// Inspect the focused cell of a notebook document.
///
/// Returns `None` for non-notebook documents and when any notebook read fails;
/// a notebook with no focused cell still reports its cell count.
pub fn inspect_notebook(
    document: &DocumentHandle,
    truncation: &TruncationConfig,
) -> Option<NotebookInspection> {
    let DocumentKind::Notebook(notebook) = &document.kind else {
        return None;
    };

    match read_notebook(notebook.as_ref(), truncation) {
        Ok(inspection) => Some(inspection),
        Err(e) => {
            tracing::warn!(
                "Failed to inspect notebook {}: {}",
                document.path.as_deref().unwrap_or(&document.id),
                e
            );
            None
        }
    }
}

fn read_notebook(
    notebook: &dyn NotebookModel,
    truncation: &TruncationConfig,
) -> Result<NotebookInspection> {
    let total_cells = notebook.cell_count()?;

    let Some(cell) = notebook.active_cell()? else {
        return Ok(NotebookInspection {
            active_cell: None,
            total_cells,
        });
    };

    let cell_index = match notebook.cell_index(&cell.id)? {
        Some(index) => index as i64,
        None => {
            tracing::debug!("Active cell {} not found among notebook cells", cell.id);
            CELL_INDEX_NOT_FOUND
        }
    };

    let (execution_count, has_output) = match cell.cell_type {
        CellType::Code => (Some(cell.execution_count), Some(cell.output_count > 0)),
        CellType::Markdown | CellType::Raw => (None, None),
    };

    Ok(NotebookInspection {
        active_cell: Some(CellMetadata {
            cell_id: cell.id,
            cell_index,
            cell_type: cell.cell_type,
            source: truncate_source(&cell.source, truncation),
            execution_count,
            has_output,
        }),
        total_cells,
    })
}

/// Keep at most `max_cell_lines` lines, appending the marker when lines were
/// dropped.
pub fn truncate_source(source: &str, truncation: &TruncationConfig) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    if lines.len() <= truncation.max_cell_lines {
        return source.to_string();
    }

    let mut truncated = lines[..truncation.max_cell_lines].join("\n");
    truncated.push_str(&truncation.marker);
    truncated
}
