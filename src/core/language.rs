//! # Language Classification
//!
//! Maps a file extension to a language tag (`"rust"`, `"python"`, ...).
//! The table is built once at startup from the built-in defaults plus the
//! `[languages]` section of the config file, then shared read-only.

use std::collections::HashMap;
use std::path::Path;

/// Tag for anything the table doesn't recognize.
pub const PLAIN_TEXT: &str = "text";

const DEFAULT_EXTENSIONS: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("json", "json"),
    ("md", "markdown"),
    ("html", "html"),
    ("css", "css"),
    ("rs", "rust"),
    ("go", "go"),
    ("sh", "bash"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("java", "java"),
    ("rb", "ruby"),
    ("lua", "lua"),
    ("xml", "xml"),
    ("ini", "ini"),
    ("sql", "sql"),
    ("php", "php"),
    ("pl", "perl"),
    ("swift", "swift"),
    ("kt", "kotlin"),
];

const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("json", "JSON"),
    ("markdown", "Markdown"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("rust", "Rust"),
    ("go", "Go"),
    ("bash", "Bash"),
    ("yaml", "YAML"),
    ("toml", "TOML"),
    ("c", "C"),
    ("cpp", "C++"),
    ("java", "Java"),
    ("ruby", "Ruby"),
    ("lua", "Lua"),
    ("xml", "XML"),
    ("ini", "INI"),
    ("sql", "SQL"),
    ("php", "PHP"),
    ("perl", "Perl"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
    (PLAIN_TEXT, "Plain Text"),
];

/// Immutable extension → language table.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    by_extension: HashMap<String, String>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::with_overrides(&HashMap::new())
    }
}

impl LanguageTable {
    /// Built-in table with `overrides` layered on top.
    /// Override keys may be written with or without the leading dot.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut by_extension: HashMap<String, String> = DEFAULT_EXTENSIONS
            .iter()
            .map(|(ext, tag)| (ext.to_string(), tag.to_string()))
            .collect();
        for (ext, tag) in overrides {
            by_extension.insert(normalize_extension(ext), tag.clone());
        }
        Self { by_extension }
    }

    /// Classify a path by its extension. Unknown or missing → `"text"`.
    pub fn classify(&self, path: &Path) -> String {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension.get(&normalize_extension(ext)))
            .cloned()
            .unwrap_or_else(|| PLAIN_TEXT.to_string())
    }
}

/// Human-readable name for a language tag, for the status bar.
pub fn display_name(tag: &str) -> String {
    DISPLAY_NAMES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| tag.to_string())
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
