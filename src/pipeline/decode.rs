use serde::de::DeserializeOwned;

use crate::models::{ComplianceReport, RewriteOutcome};

/// Decodes an analyze-mode model response. Never fails: unparseable output
/// yields a degraded non-compliant report carrying the raw output.
pub fn decode_analysis(raw: &str) -> ComplianceReport {
    parse_with_fallback(raw).unwrap_or_else(|| ComplianceReport::degraded(raw))
}

/// Decodes a rewrite-mode model response. Never fails: unparseable output
/// yields a degraded outcome whose rewritten body is the raw output
/// verbatim, so the pipeline still has something to materialize.
pub fn decode_rewrite(raw: &str) -> RewriteOutcome {
    parse_with_fallback(raw).unwrap_or_else(|| RewriteOutcome::degraded(raw))
}

// Two-step tolerance, first success wins: parse the whole trimmed output,
// then the substring between the first '{' and the last '}'. Deliberately
// nothing fuzzier than that.
fn parse_with_fallback<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}
