pub mod decode;
pub mod extract;
pub mod llm;
pub mod materialize;
pub mod prompt;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::models::{AnalysisMode, ComplianceReport, DocumentKind, RewriteOutcome};
use crate::storage::DocumentStore;
use llm::ModelClient;

/// Terminal state of a successful pipeline run.
#[derive(Debug)]
pub enum PipelineOutcome {
    Analyzed {
        filename: String,
        content_type: String,
        report: ComplianceReport,
    },
    Rewritten {
        report: serde_json::Value,
        generated_name: String,
    },
}

/// End-to-end document pipeline: validate, store, extract, prompt, invoke,
/// decode, and in rewrite mode materialize. Stages run strictly in order;
/// any failure aborts the run. Holds no per-request state, so one instance
/// serves concurrent requests.
pub struct Pipeline {
    config: AppConfig,
    store: DocumentStore,
    model: Arc<dyn ModelClient>,
}

impl Pipeline {
    pub fn new(config: AppConfig, store: DocumentStore, model: Arc<dyn ModelClient>) -> Self {
        Self {
            config,
            store,
            model,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub async fn run(
        &self,
        bytes: Vec<u8>,
        declared_type: &str,
        guidelines: Option<String>,
        mode: AnalysisMode,
    ) -> Result<PipelineOutcome, PipelineError> {
        // Validation happens before any storage write.
        let kind = DocumentKind::from_mime(declared_type)
            .ok_or_else(|| PipelineError::UnsupportedType(declared_type.to_string()))?;

        let filename = self
            .store
            .save_upload(&bytes, kind.extension())
            .await
            .map_err(PipelineError::Storage)?;
        info!("Stored uploaded document as {}", filename);

        let text = tokio::task::spawn_blocking(move || extract::extract_text(&bytes, kind))
            .await
            .map_err(|e| PipelineError::ExtractionFailed(e.into()))?
            .map_err(PipelineError::ExtractionFailed)?;

        if text.is_empty() {
            warn!("No extractable text in {}", filename);
            return Err(PipelineError::NoExtractableText);
        }
        info!("Extracted {} characters from {}", text.len(), filename);

        let guidelines = guidelines
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| prompt::DEFAULT_GUIDELINES.to_string());
        let built = prompt::build_prompt(mode, &text, &guidelines, self.config.truncation_for(mode));

        let raw = self
            .model
            .invoke(&built)
            .await
            .map_err(PipelineError::AnalysisFailed)?;

        match mode {
            AnalysisMode::Analyze => {
                let report = decode::decode_analysis(&raw);
                if report.raw_output.is_some() {
                    warn!("Model output for {} was not parseable JSON", filename);
                }
                Ok(PipelineOutcome::Analyzed {
                    filename,
                    content_type: kind.mime().to_string(),
                    report,
                })
            }
            AnalysisMode::Rewrite => {
                let RewriteOutcome {
                    report,
                    modified_text,
                } = decode::decode_rewrite(&raw);

                let doc_bytes =
                    tokio::task::spawn_blocking(move || materialize::materialize_docx(&modified_text))
                        .await
                        .map_err(|e| PipelineError::SaveFailed(e.into()))?
                        .map_err(PipelineError::SaveFailed)?;

                let generated_name = self
                    .store
                    .save_generated(&doc_bytes)
                    .await
                    .map_err(|e| PipelineError::SaveFailed(e.into()))?;
                info!("Materialized rewritten document as {}", generated_name);

                Ok(PipelineOutcome::Rewritten {
                    report,
                    generated_name,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::extract::test_docs::*;
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubModel {
        response: String,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn returning(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelClient for StubModel {
        async fn invoke(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    async fn pipeline_with(
        dir: &tempfile::TempDir,
        model: Arc<StubModel>,
    ) -> Pipeline {
        let store = DocumentStore::open(dir.path()).await.unwrap();
        Pipeline::new(AppConfig::default(), store, model)
    }

    const DOCX_MIME: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    const COMPLIANT_JSON: &str = r#"{
        "summary": {"compliant": true, "message": "Follows all guidelines"},
        "violations": [],
        "suggestions": [],
        "metrics": {"word_count": 3, "sentence_count": 1, "readability_note": "simple"}
    }"#;

    #[tokio::test]
    async fn analyze_flow_produces_compliant_report() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::returning(COMPLIANT_JSON);
        let pipeline = pipeline_with(&dir, model.clone()).await;

        let bytes = docx_with_paragraphs(&["The cat sat."]);
        let outcome = pipeline
            .run(
                bytes,
                DOCX_MIME,
                Some("Avoid passive voice.".to_string()),
                AnalysisMode::Analyze,
            )
            .await
            .unwrap();

        match outcome {
            PipelineOutcome::Analyzed {
                filename,
                content_type,
                report,
            } => {
                assert!(filename.ends_with(".docx"));
                assert_eq!(content_type, DOCX_MIME);
                assert!(report.summary.compliant);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn unsupported_type_is_rejected_before_storage() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::returning(COMPLIANT_JSON);
        let pipeline = pipeline_with(&dir, model.clone()).await;

        let result = pipeline
            .run(b"plain text".to_vec(), "text/plain", None, AnalysisMode::Analyze)
            .await;

        assert!(matches!(result, Err(PipelineError::UnsupportedType(_))));
        assert_eq!(pipeline.store().len().await.unwrap(), 0);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn textless_pdf_fails_before_the_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::returning(COMPLIANT_JSON);
        let pipeline = pipeline_with(&dir, model.clone()).await;

        let result = pipeline
            .run(pdf_without_text(), "application/pdf", None, AnalysisMode::Analyze)
            .await;

        assert!(matches!(result, Err(PipelineError::NoExtractableText)));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn corrupt_document_fails_at_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::returning(COMPLIANT_JSON);
        let pipeline = pipeline_with(&dir, model.clone()).await;

        let result = pipeline
            .run(b"garbage".to_vec(), "application/pdf", None, AnalysisMode::Analyze)
            .await;

        assert!(matches!(result, Err(PipelineError::ExtractionFailed(_))));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn prose_response_yields_degraded_report_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::returning("I cannot analyze this, sorry.");
        let pipeline = pipeline_with(&dir, model.clone()).await;

        let bytes = docx_with_paragraphs(&["Some text."]);
        let outcome = pipeline
            .run(bytes, DOCX_MIME, None, AnalysisMode::Analyze)
            .await
            .unwrap();

        match outcome {
            PipelineOutcome::Analyzed { report, .. } => {
                assert!(!report.summary.compliant);
                assert_eq!(
                    report.raw_output.as_deref(),
                    Some("I cannot analyze this, sorry.")
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rewrite_flow_materializes_a_retrievable_document() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::returning(
            r#"{"report": {"summary": "two fixes applied"}, "modified_text": "Line1\nLine2"}"#,
        );
        let pipeline = pipeline_with(&dir, model.clone()).await;

        let bytes = docx_with_paragraphs(&["Original text."]);
        let outcome = pipeline
            .run(bytes, DOCX_MIME, None, AnalysisMode::Rewrite)
            .await
            .unwrap();

        let generated_name = match outcome {
            PipelineOutcome::Rewritten {
                report,
                generated_name,
            } => {
                assert_eq!(report["summary"], "two fixes applied");
                generated_name
            }
            other => panic!("unexpected outcome: {other:?}"),
        };

        assert!(generated_name.starts_with("rewritten-"));
        let saved = pipeline.store().load(&generated_name).await.unwrap().unwrap();
        let text = extract::extract_text(&saved, DocumentKind::Docx).unwrap();
        assert_eq!(text, "Line1\nLine2");
    }

    #[tokio::test]
    async fn pdf_with_text_flows_through_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let model = StubModel::returning(COMPLIANT_JSON);
        let pipeline = pipeline_with(&dir, model.clone()).await;

        let outcome = pipeline
            .run(
                pdf_with_text("A short sentence."),
                "application/pdf",
                None,
                AnalysisMode::Analyze,
            )
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Analyzed { .. }));
        assert_eq!(model.call_count(), 1);
    }
}
