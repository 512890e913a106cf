//! Workspace root derivation and relative paths

use crate::{config::CaptureConfig, host::ServerConnection};

/// Derive the workspace root from the connection base address.
///
/// A configured root wins. Otherwise the first matching API suffix is
/// stripped from the base address. Any failure yields an empty root.
pub fn derive_workspace_root(connection: &dyn ServerConnection, config: &CaptureConfig) -> String {
    if let Some(root) = &config.workspace_root {
        return root.trim_end_matches('/').to_string();
    }

    let base = match connection.base_url() {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Failed to read connection base address: {}", e);
            return String::new();
        }
    };

    let mut root = base.trim_end_matches('/');
    if let Some(stripped) = config
        .api_suffixes
        .iter()
        .find_map(|suffix| root.strip_suffix(suffix.as_str()))
    {
        root = stripped;
    }

    root.trim_end_matches('/').to_string()
}

/// Strip `root` plus one separator from `path`; unrelated paths come back
/// unchanged.
pub fn relative_path(path: &str, root: &str) -> String {
    if root.is_empty() {
        return path.to_string();
    }

    match path.strip_prefix(root) {
        Some(rest) => rest.strip_prefix('/').unwrap_or(rest).to_string(),
        None => path.to_string(),
    }
}
