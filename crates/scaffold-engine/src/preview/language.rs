use std::path::Path;

/// Syntax-highlighting tag for a path, from its extension
pub fn language_for_path(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("cs") => "csharp",
        Some("ts") => "typescript",
        Some("tsx") => "tsx",
        Some("js") => "javascript",
        Some("jsx") => "jsx",
        Some("vue") => "vue",
        Some("json") => "json",
        Some("xml" | "csproj" | "props" | "slnx") => "xml",
        Some("html") => "html",
        Some("css") => "css",
        Some("scss") => "scss",
        Some("md") => "markdown",
        Some("yaml" | "yml") => "yaml",
        _ => "plaintext",
    }
}
