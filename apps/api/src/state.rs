use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatProvider;
use crate::optimization::optimizer::OptimizerError;
use crate::optimization::ResumeOptimizer;
use crate::parsing::ResumeParser;
use crate::prompts::PromptLoader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat backend. `LlmClient` in production, a scripted fake in tests.
    pub provider: Arc<dyn ChatProvider>,
    pub parser: Arc<ResumeParser>,
    /// The `optimization` prompt group, loaded once at startup.
    pub optimization_prompts: Arc<PromptLoader>,
    pub config: Config,
}

impl AppState {
    /// A fresh optimizer for one request. Conversations are never shared between requests.
    pub fn optimizer(&self) -> Result<ResumeOptimizer, OptimizerError> {
        ResumeOptimizer::new(
            self.provider.clone(),
            self.optimization_prompts.clone(),
            self.config.optimizer_model.clone(),
        )
    }
}
