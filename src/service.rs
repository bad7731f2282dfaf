use std::sync::Arc;

use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    config::AppConfig,
    error::PipelineError,
    models::{AnalysisMode, AnalyzeResponse, RewriteResponse},
    pipeline::{Pipeline, PipelineOutcome, llm::ModelClient},
    storage::DocumentStore,
};

type ApiResult<T> = Result<Json<T>, ApiError>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, name: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "filename": name
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn pipeline_error(err: &PipelineError) -> ApiError {
    error!("Pipeline failed at stage {}: {}", err.stage(), err);
    let mut body = json!({
        "error": err.to_string(),
        "stage": err.stage()
    });
    if let Some(detail) = err.detail() {
        body["details"] = json!(detail);
    }
    (err.status_code(), Json(body))
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub async fn create_app(config: AppConfig, model: Arc<dyn ModelClient>) -> anyhow::Result<Router> {
    let store = DocumentStore::open(&config.storage_root).await?;
    let pipeline = Arc::new(Pipeline::new(config, store, model));
    Ok(build_router(AppState { pipeline }))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/documents/analyze", post(analyze_document))
        .route("/documents/rewrite", post(rewrite_document))
        .route("/documents/{filename}", get(download_document))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Document Compliance Service",
        "version": "1.0.0",
        "description": "Checks uploaded PDF/Word documents against writing guidelines using an LLM",
        "endpoints": {
            "POST /documents/analyze": "Upload a document, get a compliance report",
            "POST /documents/rewrite": "Upload a document, get a report plus a rewritten copy",
            "GET /documents/{filename}": "Download a stored document",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

struct UploadForm {
    bytes: Vec<u8>,
    content_type: String,
    guidelines: Option<String>,
}

async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut guidelines = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request_error(&format!("invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_string).unwrap_or_default();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request_error(&format!("failed to read file field: {}", e)))?;
                file = Some((data.to_vec(), content_type));
            }
            Some("guidelines") => {
                let text = field.text().await.map_err(|e| {
                    bad_request_error(&format!("failed to read guidelines field: {}", e))
                })?;
                guidelines = Some(text);
            }
            _ => {}
        }
    }

    let (bytes, content_type) = file.ok_or_else(|| bad_request_error("missing file field"))?;
    if bytes.is_empty() {
        return Err(bad_request_error("uploaded file is empty"));
    }
    Ok(UploadForm {
        bytes,
        content_type,
        guidelines,
    })
}

async fn analyze_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<AnalyzeResponse> {
    let form = read_upload_form(&mut multipart).await?;
    info!(
        "Analyze request: {} bytes, declared type {}",
        form.bytes.len(),
        form.content_type
    );

    match state
        .pipeline
        .run(
            form.bytes,
            &form.content_type,
            form.guidelines,
            AnalysisMode::Analyze,
        )
        .await
    {
        Ok(PipelineOutcome::Analyzed {
            filename,
            content_type,
            report,
        }) => Ok(Json(AnalyzeResponse {
            filename,
            content_type,
            report,
        })),
        Ok(other) => {
            error!("Analyze pipeline produced unexpected outcome: {other:?}");
            Err(internal_error("unexpected pipeline outcome", ""))
        }
        Err(e) => Err(pipeline_error(&e)),
    }
}

async fn rewrite_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<RewriteResponse> {
    let form = read_upload_form(&mut multipart).await?;
    info!(
        "Rewrite request: {} bytes, declared type {}",
        form.bytes.len(),
        form.content_type
    );

    match state
        .pipeline
        .run(
            form.bytes,
            &form.content_type,
            form.guidelines,
            AnalysisMode::Rewrite,
        )
        .await
    {
        Ok(PipelineOutcome::Rewritten {
            report,
            generated_name,
        }) => Ok(Json(RewriteResponse {
            report,
            download_link: format!("/documents/{}", generated_name),
        })),
        Ok(other) => {
            error!("Rewrite pipeline produced unexpected outcome: {other:?}");
            Err(internal_error("unexpected pipeline outcome", ""))
        }
        Err(e) => Err(pipeline_error(&e)),
    }
}

async fn download_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    match state.pipeline.store().load(&filename).await {
        Ok(Some(bytes)) => {
            let content_type = content_type_for(&filename);
            Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
        }
        Ok(None) => Err(not_found_error("Document not found", &filename)),
        Err(e) => {
            error!("Failed to read stored document {}: {}", filename, e);
            Err(internal_error("Failed to read document", &e.to_string()))
        }
    }
}

fn content_type_for(name: &str) -> &'static str {
    if name.ends_with(".pdf") {
        "application/pdf"
    } else if name.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if name.ends_with(".doc") {
        "application/msword"
    } else {
        "application/octet-stream"
    }
}
