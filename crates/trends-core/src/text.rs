use regex::Regex;

// ── TextNormalizer ────────────────────────────────────────────────────────────

/// Surface-level cleanup of post text.
///
/// Applied in order: URLs replaced by a space, `#` replaced by a space,
/// whitespace runs collapsed, ends trimmed, lowercased. The result is a fixed
/// point: normalising it again changes nothing.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    url: Regex,
    whitespace: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            // Case-insensitive so that "HTTP://" cannot survive to be
            // lowercased into a URL.
            url: Regex::new(r"(?i)https?://\S+").expect("regex is valid"),
            whitespace: Regex::new(r"\s+").expect("regex is valid"),
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let without_urls = self.url.replace_all(text, " ");
        let without_hashes = without_urls.replace('#', " ");
        let collapsed = self.whitespace.replace_all(&without_hashes, " ");
        collapsed.trim().to_lowercase()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
