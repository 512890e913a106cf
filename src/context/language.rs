//! Best-effort language tagging for open documents

/// Guess a language tag from the registry's file-type name, falling back to
/// the path extension. `None` means "unknown", never an error.
pub fn infer_language(file_type_name: Option<&str>, path: &str) -> Option<String> {
    if let Some(name) = file_type_name {
        if !name.is_empty() && name != "text" {
            return Some(name.to_string());
        }
    }

    let ext = extension(path)?.to_lowercase();
    language_for_extension(&ext).map(str::to_string)
}

/// Text after the final `.` of the last path segment.
pub fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext) }
}

fn language_for_extension(ext: &str) -> Option<&'static str> {
    let language = match ext {
        // Source code
        "py" | "pyw" => "python",
        "rs" => "rust",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascript",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescript",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "r" => "r",
        "jl" => "julia",
        "lua" => "lua",
        "sh" | "bash" | "zsh" => "shell",
        "sql" => "sql",
        "ipynb" => "python",

        // Markup
        "md" | "markdown" => "markdown",
        "html" | "htm" => "html",
        "xml" => "xml",
        "tex" => "latex",
        "rst" => "restructuredtext",

        // Data
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "csv" => "csv",

        // Styling
        "css" => "css",
        "scss" => "scss",
        "less" => "less",

        _ => return None,
    };
    Some(language)
}
