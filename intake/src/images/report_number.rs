use regex::Regex;
use std::sync::OnceLock;

/// Label patterns tried in order. Each captures the digit run that follows the
/// label and its optional `.`/`:` punctuation.
const LABEL_PATTERNS: [&str; 3] = [
    r"(?i)Lab\s*Report\s*No[.:]?\s*(\d+)",
    r"(?i)Report\s*No[.:]?\s*(\d+)",
    r"(?i)Lab\s*No[.:]?\s*(\d+)",
];

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        LABEL_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Finds the lab report number in text recognized from a certificate image.
///
/// Returns the digits captured by the first pattern that matches, or `None`
/// when the text carries no recognizable label.
pub fn extract_report_number(text: &str) -> Option<String> {
    patterns()
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
