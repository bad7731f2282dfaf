use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Document formats the pipeline accepts, keyed by declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
}

impl DocumentKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "application/msword" => Some(Self::Doc),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
            Self::Doc => ".doc",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Doc => "application/msword",
        }
    }
}

/// How the pipeline uses the model: report only, or report plus a rewritten
/// document. The decode schema is tied to this, so it is a closed enum
/// rather than a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Analyze,
    Rewrite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub compliant: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub sentence_count: u64,
    #[serde(default)]
    pub readability_note: String,
}

/// Structured result of a guideline compliance check. `summary` is the one
/// key the model must produce; the rest default to empty so a
/// partially-complete but well-formed response still decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub summary: ReportSummary,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub metrics: ReportMetrics,
    /// Set only when the model output could not be parsed; carries the raw
    /// output for diagnosis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl ComplianceReport {
    /// Low-confidence fallback report for unparseable model output.
    pub fn degraded(raw: &str) -> Self {
        Self {
            summary: ReportSummary {
                compliant: false,
                message: "Model did not return parseable JSON".to_string(),
            },
            violations: Vec::new(),
            suggestions: Vec::new(),
            metrics: ReportMetrics::default(),
            raw_output: Some(raw.to_string()),
        }
    }
}

/// Decoded payload of a rewrite-mode model response. The report shape is
/// model-defined in this mode, so it stays a raw JSON value.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteOutcome {
    pub report: Value,
    pub modified_text: String,
}

impl RewriteOutcome {
    /// Fallback when the model output is unparseable: the raw output becomes
    /// the rewritten body verbatim so there is still something to
    /// materialize.
    pub fn degraded(raw: &str) -> Self {
        Self {
            report: json!({
                "summary": "Could not parse JSON",
                "raw_output": raw,
            }),
            modified_text: raw.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    pub content_type: String,
    pub report: ComplianceReport,
}

#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub report: Value,
    pub download_link: String,
}
