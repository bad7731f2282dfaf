use std::path::PathBuf;

use crate::models::AnalysisMode;

/// Rule for shortening oversized text before it is embedded in a prompt.
#[derive(Debug, Clone)]
pub struct TruncationPolicy {
    /// Maximum number of characters kept from the document text.
    pub max_chars: usize,
    /// Appended after the cut, when set, so the model knows text is missing.
    pub marker: Option<String>,
}

impl TruncationPolicy {
    pub fn with_marker(max_chars: usize, marker: &str) -> Self {
        Self {
            max_chars,
            marker: Some(marker.to_string()),
        }
    }

    pub fn bare(max_chars: usize) -> Self {
        Self {
            max_chars,
            marker: None,
        }
    }
}

/// Service configuration, passed explicitly into the pipeline at
/// construction. The storage root exists for the process duration; cleanup
/// is an external concern.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_root: PathBuf,
    pub model: String,
    /// Fixed at 0.0: the result decoder relies on low format variance from
    /// the model.
    pub temperature: f64,
    pub analyze_truncation: TruncationPolicy,
    pub rewrite_truncation: TruncationPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("uploads"),
            model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.0,
            analyze_truncation: TruncationPolicy::with_marker(6000, "\n\n[Content truncated]"),
            rewrite_truncation: TruncationPolicy::bare(5000),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            config.storage_root = PathBuf::from(dir);
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.model = model;
        }
        config
    }

    pub fn truncation_for(&self, mode: AnalysisMode) -> &TruncationPolicy {
        match mode {
            AnalysisMode::Analyze => &self.analyze_truncation,
            AnalysisMode::Rewrite => &self.rewrite_truncation,
        }
    }
}
