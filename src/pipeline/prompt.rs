use crate::config::TruncationPolicy;
use crate::models::AnalysisMode;

/// House style applied when the caller supplies no guidelines.
pub const DEFAULT_GUIDELINES: &str = "Use clear, concise language. Prefer active voice. \
Keep sentences under 25 words. Avoid jargon, filler phrases, and undefined acronyms.";

/// Cuts `text` to at most `policy.max_chars` characters, appending the
/// policy's marker (when set) after a cut.
pub fn truncate(text: &str, policy: &TruncationPolicy) -> String {
    if text.chars().count() <= policy.max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(policy.max_chars).collect();
    if let Some(marker) = &policy.marker {
        cut.push_str(marker);
    }
    cut
}

/// Builds the instruction sent to the model. Each mode enumerates its exact
/// JSON schema and forbids any prose outside the object; the decoder relies
/// on that contract.
pub fn build_prompt(
    mode: AnalysisMode,
    text: &str,
    guidelines: &str,
    policy: &TruncationPolicy,
) -> String {
    let body = truncate(text, policy);
    match mode {
        AnalysisMode::Analyze => format!(
            "You are a writing compliance reviewer. Check the document text below against \
            the writing guidelines and respond with a single JSON object and nothing else: \
            no prose before or after it, no markdown fences.\n\n\
            The JSON object must have exactly these keys:\n\
            - \"summary\": {{\"compliant\": boolean, \"message\": string}}\n\
            - \"violations\": array of {{\"rule\": string, \"message\": string, \"examples\": array of strings}}\n\
            - \"suggestions\": array of strings\n\
            - \"metrics\": {{\"word_count\": integer, \"sentence_count\": integer, \"readability_note\": string}}\n\n\
            Writing guidelines:\n{guidelines}\n\n\
            Document text:\n{body}"
        ),
        AnalysisMode::Rewrite => format!(
            "You are a writing compliance editor. Check the document text below against \
            the writing guidelines, then rewrite it so it fully complies. Respond with a \
            single JSON object and nothing else: no prose before or after it, no markdown \
            fences.\n\n\
            The JSON object must have exactly these keys:\n\
            - \"report\": an object summarizing compliance findings for the original text\n\
            - \"modified_text\": the complete rewritten document as a single string, \
            paragraphs separated by newlines\n\n\
            Writing guidelines:\n{guidelines}\n\n\
            Document text:\n{body}"
        ),
    }
}
