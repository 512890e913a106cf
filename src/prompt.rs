//! Rendering of a decoded snapshot into the system prompt's
//! "ACTIVE FILE CONTEXT:" section.

use crate::{
    config::PromptConfig,
    types::{CellMetadata, CellType, ContextSnapshot, DocumentMetadata},
};

const HEADER: &str = "ACTIVE FILE CONTEXT:";

pub fn format_active_context(snapshot: Option<&ContextSnapshot>, config: &PromptConfig) -> String {
    let Some(snapshot) = snapshot else {
        return format!("{} No active file context available.", HEADER);
    };

    let mut parts = vec![HEADER.to_string()];

    match &snapshot.active_document {
        Some(doc) if doc.is_notebook => {
            parts.push(format!(
                "• Currently active notebook: {}{}{}",
                doc.relative_path,
                language_suffix(doc),
                size_suffix(doc)
            ));
            parts.extend(notebook_lines(doc, config));
        }
        Some(doc) => {
            let cursor = doc
                .cursor_position
                .map(|c| format!(" (cursor at line {}, column {})", c.line, c.column))
                .unwrap_or_default();
            parts.push(format!(
                "• Currently active file: {}{}{}{}",
                doc.relative_path,
                language_suffix(doc),
                size_suffix(doc),
                cursor
            ));
        }
        None => parts.push("• No file is currently active in the editor".to_string()),
    }

    let others: Vec<&DocumentMetadata> = snapshot.non_active_documents().collect();
    if !others.is_empty() {
        parts.push(format!("• Other open tabs ({}):", others.len()));
        for doc in others.iter().take(config.max_listed_tabs) {
            let notebook = if doc.is_notebook { " [notebook]" } else { "" };
            parts.push(format!(
                "  - {}{}{}{}",
                doc.relative_path,
                language_suffix(doc),
                size_suffix(doc),
                notebook
            ));
        }
        if others.len() > config.max_listed_tabs {
            parts.push(format!(
                "  ... and {} more files",
                others.len() - config.max_listed_tabs
            ));
        }
    }

    if !snapshot.workspace_root.is_empty() {
        parts.push(format!("• Workspace root: {}", snapshot.workspace_root));
    }

    parts.join("\n")
}

fn language_suffix(doc: &DocumentMetadata) -> String {
    match doc.language.as_deref() {
        Some(language) if !language.is_empty() => format!(" [{}]", language),
        _ => String::new(),
    }
}

fn size_suffix(doc: &DocumentMetadata) -> String {
    match doc.size {
        Some(size) if size > 0 => format!(" ({:.1}KB)", size as f64 / 1024.0),
        _ => String::new(),
    }
}

fn notebook_lines(doc: &DocumentMetadata, config: &PromptConfig) -> Vec<String> {
    let mut lines = vec![format!("  - Total cells: {}", doc.total_cells.unwrap_or(0))];

    if let Some(cell) = &doc.active_cell {
        lines.push(format!(
            "  - Active cell: #{} ({}){}",
            cell.cell_index + 1,
            cell.cell_type,
            execution_suffix(cell)
        ));

        if !cell.source.is_empty() {
            lines.push(format!(
                "  - Cell content: {}",
                source_preview(&cell.source, config.source_preview_chars)
            ));
        }
    }

    lines
}

fn execution_suffix(cell: &CellMetadata) -> String {
    if cell.cell_type != CellType::Code {
        return String::new();
    }

    let mut info = Vec::new();
    if let Some(Some(count)) = cell.execution_count {
        info.push(format!("exec count: {}", count));
    }
    if cell.has_output == Some(true) {
        info.push("has output".to_string());
    }

    if info.is_empty() {
        String::new()
    } else {
        format!(" [{}]", info.join(", "))
    }
}

fn source_preview(source: &str, max_chars: usize) -> String {
    let head: String = source.chars().take(max_chars).collect();
    let mut preview = head.replace('\n', " ").trim().to_string();
    if source.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CursorPosition;

    fn doc(path: &str) -> DocumentMetadata {
        DocumentMetadata {
            path: format!("/w/{}", path),
            relative_path: path.to_string(),
            mime_type: "text/plain".to_string(),
            size: None,
            language: None,
            cursor_position: None,
            is_active: false,
            is_notebook: false,
            active_cell: None,
            total_cells: None,
        }
    }

    fn snapshot(active: Option<DocumentMetadata>, open: Vec<DocumentMetadata>) -> ContextSnapshot {
        ContextSnapshot {
            active_document: active,
            open_documents: open,
            workspace_root: "/w".to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_no_snapshot() {
        assert_eq!(
            format_active_context(None, &PromptConfig::default()),
            "ACTIVE FILE CONTEXT: No active file context available."
        );
    }

    #[test]
    fn test_active_file_with_cursor() {
        let mut active = doc("src/main.rs");
        active.is_active = true;
        active.language = Some("rust".to_string());
        active.size = Some(2048);
        active.cursor_position = Some(CursorPosition { line: 12, column: 3 });

        let text = format_active_context(
            Some(&snapshot(Some(active.clone()), vec![active])),
            &PromptConfig::default(),
        );
        assert_eq!(
            text,
            "ACTIVE FILE CONTEXT:\n\
             • Currently active file: src/main.rs [rust] (2.0KB) (cursor at line 12, column 3)\n\
             • Workspace root: /w"
        );
    }

    #[test]
    fn test_active_notebook_cell() {
        let mut active = doc("nb.ipynb");
        active.is_active = true;
        active.is_notebook = true;
        active.total_cells = Some(5);
        active.active_cell = Some(CellMetadata {
            cell_id: "c2".to_string(),
            cell_index: 2,
            cell_type: CellType::Code,
            source: "df = load()\ndf.head()".to_string(),
            execution_count: Some(Some(1)),
            has_output: Some(true),
        });

        let text = format_active_context(Some(&snapshot(Some(active), vec![])), &PromptConfig::default());
        assert!(text.contains("• Currently active notebook: nb.ipynb\n"));
        assert!(text.contains("  - Total cells: 5"));
        assert!(text.contains("  - Active cell: #3 (code) [exec count: 1, has output]"));
        assert!(text.contains("  - Cell content: df = load() df.head()"));
    }

    #[test]
    fn test_unexecuted_cell_has_no_exec_info() {
        let cell = CellMetadata {
            cell_id: "c0".to_string(),
            cell_index: 0,
            cell_type: CellType::Code,
            source: String::new(),
            execution_count: Some(None),
            has_output: Some(false),
        };
        assert_eq!(execution_suffix(&cell), "");
    }

    #[test]
    fn test_lists_at_most_five_other_tabs() {
        let open: Vec<_> = (0..7).map(|i| doc(&format!("f{}.txt", i))).collect();
        let text = format_active_context(Some(&snapshot(None, open)), &PromptConfig::default());

        assert!(text.contains("• No file is currently active in the editor"));
        assert!(text.contains("• Other open tabs (7):"));
        assert!(text.contains("  - f4.txt"));
        assert!(!text.contains("  - f5.txt"));
        assert!(text.contains("  ... and 2 more files"));
    }

    #[test]
    fn test_source_preview_is_cut() {
        let source = "x".repeat(150);
        let preview = source_preview(&source, 100);
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));
        assert_eq!(source_preview("  a\nb  ", 100), "a b");
    }
}
