use std::path::Path;

use rand::Rng;

/// Type fragments accepted for uploads; both the declared content type and the
/// file extension must contain one of them.
const ALLOWED_TYPES: [&str; 5] = ["jpeg", "jpg", "png", "gif", "pdf"];

fn matches_allowed(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    ALLOWED_TYPES.iter().any(|t| s.contains(t))
}

/// Extension of `original_name` including the leading dot, or "" when absent.
pub fn extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

pub fn is_allowed(content_type: &str, original_name: &str) -> bool {
    matches_allowed(content_type) && matches_allowed(&extension(original_name))
}

/// `<millis>-<suffix><ext>`, unique enough for a single uploads directory.
pub fn stored_file_name(original_name: &str, now_millis: i64, suffix: u64) -> String {
    format!("{now_millis}-{suffix}{}", extension(original_name))
}

pub fn random_suffix() -> u64 {
    rand::rng().random_range(0..=1_000_000_000)
}
