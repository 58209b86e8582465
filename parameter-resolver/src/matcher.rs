use once_cell::sync::Lazy;
use regex::Regex;

use crate::dedup::dedup_references;
use crate::domain::ParameterReference;

// Whitespace inside the braces is tolerated, the reference itself is captured.
// Names are ASCII only: letters, digits, underscore, hyphen and slash.
static PARAMETER_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(ssm:[A-Za-z0-9_\-/]+)\s*\}\}").expect("valid regex"));
static SECURE_PARAMETER_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(ssm-secure:[A-Za-z0-9_\-/]+)\s*\}\}").expect("valid regex"));
static ANY_PARAMETER_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*((?:ssm|ssm-secure):[A-Za-z0-9_\-/]+)\s*\}\}").expect("valid regex")
});

/// Pattern matching both placeholder forms, capture group 1 is the full reference.
pub(crate) fn any_placeholder() -> &'static Regex {
    &ANY_PARAMETER_PLACEHOLDER
}

/// Returns the distinct references found in `text`.
///
/// Secure placeholders are only collected when `include_secure` is set. The
/// result is sorted; an input without placeholders yields an empty list.
pub fn references(text: &str, include_secure: bool) -> Vec<ParameterReference> {
    let mut found = captures(&PARAMETER_PLACEHOLDER, text);
    if include_secure {
        found.extend(captures(&SECURE_PARAMETER_PLACEHOLDER, text));
    }
    dedup_references(found)
}

fn captures(pattern: &Regex, text: &str) -> Vec<ParameterReference> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| ParameterReference::parse(m.as_str()).ok())
        .collect()
}
