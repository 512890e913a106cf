//! Per-document metadata resolution

use super::{
    cursor::locate_cursor,
    language::{extension, infer_language},
    notebook::inspect_notebook,
    workspace::relative_path,
};
use crate::{
    config::Config,
    host::{HostServices, Pane},
    types::DocumentMetadata,
};
use tracing::{debug, warn};

/// Resolves open panes into [`DocumentMetadata`] against one workspace root.
#[derive(Debug, Clone, Copy)]
pub struct DocumentResolver<'a> {
    host: &'a HostServices,
    config: &'a Config,
    workspace_root: &'a str,
}

impl<'a> DocumentResolver<'a> {
    pub fn new(host: &'a HostServices, config: &'a Config, workspace_root: &'a str) -> Self {
        Self {
            host,
            config,
            workspace_root,
        }
    }

    /// Metadata for one pane, or `None` when the pane is not a document, has
    /// no path, or its storage metadata cannot be fetched.
    pub async fn resolve(&self, pane: &Pane, is_active: bool) -> Option<DocumentMetadata> {
        let document = pane.as_document()?;
        let Some(path) = document.path.as_deref().filter(|p| !p.is_empty()) else {
            debug!("Skipping pane {} without a path", document.id);
            return None;
        };

        let info = match self.host.contents.metadata(path).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Failed to fetch metadata for {}: {}", path, e);
                return None;
            }
        };

        let file_type = self.host.file_types.file_type(&info);
        let language = infer_language(file_type.as_ref().map(|t| t.name.as_str()), path);
        let mime_type = info
            .mimetype
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.config.capture.default_mime_type.clone());

        let is_notebook = extension(path)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.capture.notebook_extension));

        let cursor_position = if is_active {
            locate_cursor(document)
        } else {
            None
        };

        let (active_cell, total_cells) = if is_notebook && is_active {
            match inspect_notebook(document, &self.config.truncation) {
                Some(inspection) => (inspection.active_cell, Some(inspection.total_cells)),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        debug!("Resolved {} (active: {}, notebook: {})", path, is_active, is_notebook);

        Some(DocumentMetadata {
            path: path.to_string(),
            relative_path: relative_path(path, self.workspace_root),
            mime_type,
            size: info.size,
            language,
            cursor_position,
            is_active,
            is_notebook,
            active_cell,
            total_cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixture::{FixtureDocument, FixtureHost, FixtureKind, FixtureNotebook},
        host::CellSnapshot,
        types::{CellType, CursorPosition},
    };
    use std::sync::Arc;

    fn host(documents: Vec<FixtureDocument>) -> HostServices {
        HostServices::from_single(Arc::new(FixtureHost::new("/w", documents)))
    }

    fn editor(path: &str, line: usize, column: usize) -> FixtureDocument {
        FixtureDocument::new(path, FixtureKind::TextEditor {
            cursor: Some(CursorPosition { line, column }),
            fail_cursor: false,
        })
    }

    fn notebook(path: &str) -> FixtureDocument {
        FixtureDocument::new(path, FixtureKind::Notebook(FixtureNotebook {
            cells: vec![CellSnapshot::new("c0", CellType::Code, "x = 1")],
            active: Some(0),
            fail: false,
        }))
    }

    fn pane(host: &HostServices, path: &str) -> Pane {
        host.workbench
            .panes("main")
            .into_iter()
            .find(|p| p.as_document().and_then(|d| d.path.as_deref()) == Some(path))
            .unwrap()
    }

    #[tokio::test]
    async fn test_active_editor_document() {
        let host = host(vec![editor("/w/src/lib.rs", 3, 9)
            .with_size(2048)
            .with_mimetype("text/rust")]);
        let config = Config::default();
        let resolver = DocumentResolver::new(&host, &config, "/w");

        let doc = resolver.resolve(&pane(&host, "/w/src/lib.rs"), true).await.unwrap();
        assert_eq!(doc.relative_path, "src/lib.rs");
        assert_eq!(doc.language.as_deref(), Some("rust"));
        assert_eq!(doc.size, Some(2048));
        assert_eq!(doc.mime_type, "text/rust");
        assert_eq!(doc.cursor_position, Some(CursorPosition { line: 3, column: 9 }));
        assert!(doc.is_active);
        assert!(!doc.is_notebook);
        assert!(doc.active_cell.is_none());
        assert!(doc.total_cells.is_none());
    }

    #[tokio::test]
    async fn test_inactive_document_has_no_cursor() {
        let host = host(vec![editor("/w/a.py", 1, 1)]);
        let config = Config::default();
        let resolver = DocumentResolver::new(&host, &config, "/w");

        let doc = resolver.resolve(&pane(&host, "/w/a.py"), false).await.unwrap();
        assert!(doc.cursor_position.is_none());
        assert!(!doc.is_active);
    }

    #[tokio::test]
    async fn test_inactive_notebook_has_no_cells() {
        let host = host(vec![notebook("/w/nb.ipynb")]);
        let config = Config::default();
        let resolver = DocumentResolver::new(&host, &config, "/w");

        let doc = resolver.resolve(&pane(&host, "/w/nb.ipynb"), false).await.unwrap();
        assert!(doc.is_notebook);
        assert!(doc.active_cell.is_none());
        assert!(doc.total_cells.is_none());

        let doc = resolver.resolve(&pane(&host, "/w/nb.ipynb"), true).await.unwrap();
        assert_eq!(doc.total_cells, Some(1));
        assert!(doc.active_cell.is_some());
    }

    #[tokio::test]
    async fn test_missing_mimetype_uses_default() {
        let host = host(vec![FixtureDocument::new("/w/data.bin", FixtureKind::Generic)]);
        let config = Config::default();
        let resolver = DocumentResolver::new(&host, &config, "/w");

        let doc = resolver.resolve(&pane(&host, "/w/data.bin"), false).await.unwrap();
        assert_eq!(doc.mime_type, "text/plain");
        assert!(doc.language.is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_is_absent() {
        let host = host(vec![editor("/w/gone.rs", 0, 0).failing_storage()]);
        let config = Config::default();
        let resolver = DocumentResolver::new(&host, &config, "/w");

        assert!(resolver.resolve(&pane(&host, "/w/gone.rs"), true).await.is_none());
    }

    #[tokio::test]
    async fn test_non_document_and_pathless_panes() {
        let host = host(vec![]);
        let config = Config::default();
        let resolver = DocumentResolver::new(&host, &config, "/w");

        let terminal = Pane::Other {
            id: "term-1".to_string(),
            label: "Terminal 1".to_string(),
        };
        assert!(resolver.resolve(&terminal, true).await.is_none());

        let untitled = Pane::Document(crate::host::DocumentHandle {
            id: "untitled".to_string(),
            path: None,
            kind: crate::host::DocumentKind::Generic,
        });
        assert!(resolver.resolve(&untitled, true).await.is_none());
    }
}
