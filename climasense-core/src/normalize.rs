//! Normalization of free-text model output before JSON parsing.
//!
//! Models asked for "JSON only" still wrap their answer in markdown fences
//! now and then. This is the single place that knows how to peel them off.

const FENCE: &str = "```";

/// Strip an optional markdown code fence (triple backticks, optionally tagged
/// `json`) around `text` and return the trimmed payload.
///
/// Text that does not start with a fence is returned trimmed and otherwise
/// untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let rest = strip_language_tag(rest);
    let rest = rest.trim_end();
    let rest = rest.strip_suffix(FENCE).unwrap_or(rest);

    rest.trim()
}

fn strip_language_tag(rest: &str) -> &str {
    match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    }
}
