//! Naming rules for uploaded files.

use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.-]").expect("valid regex"));

/// Name used when nothing survives sanitisation.
pub const FALLBACK_NAME: &str = "upload";

/// Strip every character outside `[a-zA-Z0-9.-]`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(name, "");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Name under which an upload is stored: `<unix-millis>-<sanitised name>`.
pub fn stored_filename(original: &str, unix_millis: i64) -> String {
    format!("{unix_millis}-{}", sanitize_filename(original))
}
