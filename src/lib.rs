pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod service;
pub mod storage;

pub use config::{AppConfig, TruncationPolicy};
pub use error::PipelineError;
pub use pipeline::llm::{ModelClient, OpenRouterClient};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use service::{AppState, create_app};
pub use models::*;
