use std::sync::Arc;

use crate::chatbot::ChatbotService;
use crate::config::Config;
use crate::conversation::ConversationStore;
use crate::cv::analyzer::CvAnalyzer;
use crate::cv::document::DocumentTextExtractor;
use crate::llm_client::CompletionGateway;
use crate::scholarship::ScholarshipService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cv: Arc<CvAnalyzer>,
    /// Owns the session-scoped conversation store.
    pub chatbot: Arc<ChatbotService>,
    pub scholarship: Arc<ScholarshipService>,
}

impl AppState {
    /// Wires every service to the same completion gateway.
    pub fn new(
        config: Config,
        llm: Arc<dyn CompletionGateway>,
        text_extractor: Arc<dyn DocumentTextExtractor>,
    ) -> Self {
        let cv = CvAnalyzer::new(
            llm.clone(),
            text_extractor,
            config.budget_thresholds,
            config.exchange_rates,
        );
        let chatbot = ChatbotService::new(llm.clone(), ConversationStore::new());
        let scholarship =
            ScholarshipService::new(llm, config.budget_thresholds, config.exchange_rates);

        Self {
            config,
            cv: Arc::new(cv),
            chatbot: Arc::new(chatbot),
            scholarship: Arc::new(scholarship),
        }
    }
}
