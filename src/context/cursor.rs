use crate::{
    host::{DocumentHandle, DocumentKind},
    types::CursorPosition,
};

/// Primary cursor of an editor-backed document.
///
/// Documents without an editor surface (viewers, notebooks) and failed reads
/// both yield `None`.
pub fn locate_cursor(document: &DocumentHandle) -> Option<CursorPosition> {
    let DocumentKind::TextEditor(editor) = &document.kind else {
        return None;
    };

    match editor.cursor() {
        Ok(position) => position,
        Err(e) => {
            tracing::warn!(
                "Failed to read cursor for {}: {}",
                document.path.as_deref().unwrap_or(&document.id),
                e
            );
            None
        }
    }
}
