use regex::Regex;
use std::sync::LazyLock;

/// A markdown code fence, optionally tagged `yaml`/`yml`, at the start of the text.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[ \t]*(?:ya?ml)?[ \t]*\r?\n(.*?)(?:```|\z)").expect("fence pattern is valid")
});

/// Return the YAML payload of generated workflow text.
///
/// Text wrapped in a markdown fence yields the fenced body; anything else is
/// returned trimmed.
pub fn extract_yaml(text: &str) -> &str {
    let trimmed = text.trim();
    match FENCED_BLOCK.captures(trimmed).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => trimmed,
    }
}
