//! Active context capture
//!
//! Walks the host's open panes and produces a [`ContextSnapshot`] describing
//! what the user is looking at: focused document, cursor, open documents and,
//! for notebooks, the focused cell.

pub mod cursor;
pub mod document;
pub mod language;
pub mod notebook;
pub mod workspace;

pub use document::DocumentResolver;
pub use language::infer_language;
pub use notebook::{NotebookInspection, inspect_notebook, truncate_source};
pub use workspace::{derive_workspace_root, relative_path};

use crate::{config::Config, host::HostServices, types::ContextSnapshot};
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Context aggregator - coordinates per-document resolution into a snapshot
#[derive(Debug, Clone)]
pub struct ContextCapture {
    host: HostServices,
    config: Arc<Config>,
}

impl ContextCapture {
    pub fn new(host: HostServices, config: Config) -> Self {
        Self {
            host,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Capture the current editor state.
    ///
    /// Never fails: documents that cannot be resolved are left out and
    /// unreadable details become absent fields.
    pub async fn capture(&self) -> ContextSnapshot {
        let workspace_root =
            derive_workspace_root(self.host.connection.as_ref(), &self.config.capture);
        let resolver = DocumentResolver::new(&self.host, &self.config, &workspace_root);

        let current = self.host.workbench.current_pane();
        let current_id = current.as_ref().map(|pane| pane.id().to_string());
        let panes = self.host.workbench.panes(&self.config.capture.main_area);

        let open = join_all(
            panes
                .iter()
                .filter(|pane| pane.as_document().is_some())
                .map(|pane| {
                    let is_active = current_id.as_deref() == Some(pane.id());
                    resolver.resolve(pane, is_active)
                }),
        );
        let active = async {
            match &current {
                Some(pane) => resolver.resolve(pane, true).await,
                None => None,
            }
        };

        let (open, active_document) = futures::join!(open, active);
        let open_documents: Vec<_> = open.into_iter().flatten().collect();

        debug!(
            "Captured {} of {} panes (active: {})",
            open_documents.len(),
            panes.len(),
            active_document
                .as_ref()
                .map(|doc| doc.relative_path.as_str())
                .unwrap_or("none")
        );

        ContextSnapshot {
            active_document,
            open_documents,
            workspace_root,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixture::{FixtureDocument, FixtureHost, FixtureKind, FixtureNotebook, FixturePane},
        host::CellSnapshot,
        types::{CellType, CursorPosition},
    };

    fn capture_for(host: FixtureHost) -> ContextCapture {
        ContextCapture::new(HostServices::from_single(Arc::new(host)), Config::default())
    }

    fn editor(path: &str) -> FixtureDocument {
        FixtureDocument::new(path, FixtureKind::TextEditor {
            cursor: Some(CursorPosition { line: 10, column: 4 }),
            fail_cursor: false,
        })
    }

    fn five_cell_notebook() -> FixtureNotebook {
        FixtureNotebook {
            cells: vec![
                CellSnapshot::new("c0", CellType::Markdown, "# Analysis"),
                CellSnapshot::new("c1", CellType::Code, "import pandas as pd"),
                CellSnapshot::new("c2", CellType::Code, "df = load()\ndf.head()\ndf.describe()")
                    .executed(1, 0),
                CellSnapshot::new("c3", CellType::Code, ""),
                CellSnapshot::new("c4", CellType::Raw, ""),
            ],
            active: Some(2),
            fail: false,
        }
    }

    #[tokio::test]
    async fn test_notebook_scenario() {
        let host = FixtureHost::new("/home/user/proj", vec![FixtureDocument::new(
            "/home/user/proj/nb.ipynb",
            FixtureKind::Notebook(five_cell_notebook()),
        )])
        .with_focus("/home/user/proj/nb.ipynb");

        let snapshot = capture_for(host).capture().await;
        assert_eq!(snapshot.workspace_root, "/home/user/proj");

        let doc = snapshot.active_document.unwrap();
        assert_eq!(doc.relative_path, "nb.ipynb");
        assert!(doc.is_notebook);
        assert!(doc.is_active);
        assert_eq!(doc.total_cells, Some(5));

        let cell = doc.active_cell.unwrap();
        assert_eq!(cell.cell_index, 2);
        assert_eq!(cell.execution_count, Some(Some(1)));
        assert_eq!(cell.has_output, Some(false));
        assert_eq!(cell.source, "df = load()\ndf.head()\ndf.describe()");

        assert_eq!(snapshot.open_documents.len(), 1);
        assert_eq!(snapshot.open_documents[0].path, "/home/user/proj/nb.ipynb");
    }

    #[tokio::test]
    async fn test_open_documents_keep_pane_order() {
        let host = FixtureHost::new("/w", vec![editor("/w/b.rs"), editor("/w/a.py"), editor("/w/c.md")])
            .with_pane(FixturePane::Other {
                id: "term".to_string(),
                label: "Terminal".to_string(),
            })
            .with_focus("/w/a.py");

        let snapshot = capture_for(host).capture().await;
        let paths: Vec<_> = snapshot.open_documents.iter().map(|d| d.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["b.rs", "a.py", "c.md"]);

        for doc in &snapshot.open_documents {
            assert_eq!(doc.is_active, doc.path == "/w/a.py");
            if !doc.is_active {
                assert!(doc.cursor_position.is_none());
            }
        }

        let active = snapshot.active_document.unwrap();
        assert_eq!(active.cursor_position, Some(CursorPosition { line: 10, column: 4 }));
        assert!(snapshot.open_documents.iter().any(|d| d.path == active.path));
    }

    #[tokio::test]
    async fn test_one_failing_document_is_isolated() {
        let host = FixtureHost::new("/w", vec![
            editor("/w/a.rs"),
            editor("/w/broken.rs").failing_storage(),
            editor("/w/c.rs"),
        ])
        .with_focus("/w/a.rs");

        let snapshot = capture_for(host).capture().await;
        let paths: Vec<_> = snapshot.open_documents.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["/w/a.rs", "/w/c.rs"]);
        assert!(snapshot.active_document.is_some());
    }

    #[tokio::test]
    async fn test_only_document_failing_gives_empty_snapshot() {
        let host = FixtureHost::new("/w", vec![editor("/w/a.rs").failing_storage()])
            .with_focus("/w/a.rs");

        let snapshot = capture_for(host).capture().await;
        assert!(snapshot.open_documents.is_empty());
        assert!(snapshot.active_document.is_none());
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_focused_non_document_pane() {
        let host = FixtureHost::new("/w", vec![editor("/w/a.rs")])
            .with_pane(FixturePane::Other {
                id: "term".to_string(),
                label: "Terminal".to_string(),
            })
            .with_focus("term");

        let snapshot = capture_for(host).capture().await;
        assert!(snapshot.active_document.is_none());
        assert_eq!(snapshot.open_documents.len(), 1);
        assert!(!snapshot.open_documents[0].is_active);
    }

    #[tokio::test]
    async fn test_capture_is_idempotent() {
        let host = FixtureHost::new("/w", vec![
            editor("/w/a.rs"),
            FixtureDocument::new("/w/nb.ipynb", FixtureKind::Notebook(five_cell_notebook())),
        ])
        .with_focus("/w/nb.ipynb");
        let capture = capture_for(host);

        let first = capture.capture().await;
        let mut second = capture.capture().await;
        second.timestamp = first.timestamp;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_non_notebooks_never_carry_cells() {
        let host = FixtureHost::new("/w", vec![editor("/w/a.rs"), editor("/w/b.txt")])
            .with_focus("/w/a.rs");

        let snapshot = capture_for(host).capture().await;
        for doc in snapshot.open_documents.iter().chain(snapshot.active_document.iter()) {
            assert!(!doc.is_notebook);
            assert!(doc.active_cell.is_none());
            assert!(doc.total_cells.is_none());
        }
    }

    #[tokio::test]
    async fn test_unreachable_connection_keeps_absolute_paths() {
        let mut host = FixtureHost::new("/w", vec![editor("/w/a.rs")]).with_focus("/w/a.rs");
        host.base_url = None;

        let snapshot = capture_for(host).capture().await;
        assert_eq!(snapshot.workspace_root, "");
        assert_eq!(snapshot.active_document.unwrap().relative_path, "/w/a.rs");
    }

    #[tokio::test]
    async fn test_notebook_read_failure_drops_cell_fields_only() {
        let mut notebook = five_cell_notebook();
        notebook.fail = true;
        let host = FixtureHost::new("/w", vec![FixtureDocument::new(
            "/w/nb.ipynb",
            FixtureKind::Notebook(notebook),
        )])
        .with_focus("/w/nb.ipynb");

        let doc = capture_for(host).capture().await.active_document.unwrap();
        assert!(doc.is_notebook);
        assert!(doc.active_cell.is_none());
        assert!(doc.total_cells.is_none());
    }
}
