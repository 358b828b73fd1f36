//! Conversational assistant. Session state (CV context and history) lives in the
//! injected `ConversationStore`; the service itself is stateless.
//!
//! Replies are prose and are returned as `{response}` / `{summary}` without going
//! through the response extractor. A failed model call becomes
//! `{"error": "<Action> error: ..."}` and leaves the history untouched.

use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::chatbot::prompts::{
    CHAT_PROMPT, COMPARE_PROMPT, CONTEXT_WITHOUT_CV, CONTEXT_WITH_CV, NO_PREVIOUS_CONVERSATION,
    PREPARATION_PROMPT, SCHOLARSHIP_PROMPT, SUMMARY_PROMPT, UNIVERSITY_PROMPT,
};
use crate::conversation::ConversationStore;
use crate::errors::ServiceFault;
use crate::llm_client::prompts::{cv_context_block, render};
use crate::llm_client::{CompletionGateway, CompletionRequest};
use crate::models::conversation::ConversationTurn;
use crate::timeline::DATE_FORMAT;

/// Only the most recent turns are replayed into the chat prompt.
const HISTORY_PROMPT_TURNS: usize = 5;
/// Assistant replies are cut to this many characters when replayed.
const ASSISTANT_EXCERPT_CHARS: usize = 200;

pub struct ChatbotService {
    llm: Arc<dyn CompletionGateway>,
    store: ConversationStore,
}

impl ChatbotService {
    pub fn new(llm: Arc<dyn CompletionGateway>, store: ConversationStore) -> Self {
        Self { llm, store }
    }

    pub async fn set_context(&self, session: &str, cv_analysis: Value) -> Value {
        self.store.set_context(session, cv_analysis).await;
        info!("CV context set for session {session}");
        json!({ "status": "Context set successfully" })
    }

    pub async fn chat(&self, session: &str, message: &str) -> Value {
        self.try_chat(session, message)
            .await
            .unwrap_or_else(|fault| fault.into_record("Chat"))
    }

    async fn try_chat(&self, session: &str, message: &str) -> Result<Value, ServiceFault> {
        let snapshot = self.store.snapshot(session).await;

        let context = match &snapshot.cv_context {
            Some(ctx) => render(
                CONTEXT_WITH_CV,
                &[("cv_context", cv_context_block(Some(ctx)).as_str())],
            ),
            None => CONTEXT_WITHOUT_CV.to_string(),
        };
        let history = format_history(&snapshot.history);
        let prompt = render(
            CHAT_PROMPT,
            &[
                ("context", context.as_str()),
                ("history", history.as_str()),
                ("message", message),
            ],
        );

        let reply = self.llm.complete(CompletionRequest::text(prompt)).await?;

        let conversation_id = self
            .store
            .append_turn(session, ConversationTurn::new(message, reply.clone()))
            .await;

        Ok(json!({
            "response": reply,
            "conversation_id": conversation_id,
        }))
    }

    pub async fn ask_universities(
        &self,
        session: &str,
        university: &str,
        question: Option<&str>,
    ) -> Value {
        let cv_context = self.cv_context(session).await;
        let prompt = render(
            UNIVERSITY_PROMPT,
            &[
                ("university", university),
                ("cv_context", cv_context.as_str()),
                (
                    "question",
                    question.unwrap_or("General information about this university"),
                ),
            ],
        );
        self.respond(prompt, "response", "University query").await
    }

    pub async fn ask_scholarships(
        &self,
        session: &str,
        scholarship_type: Option<&str>,
        country: Option<&str>,
        today: NaiveDate,
    ) -> Value {
        let cv_context = self.cv_context(session).await;
        let current_date = today.format(DATE_FORMAT).to_string();
        let prompt = render(
            SCHOLARSHIP_PROMPT,
            &[
                ("cv_context", cv_context.as_str()),
                ("scholarship_type", scholarship_type.unwrap_or("all types")),
                ("country", country.unwrap_or("any country")),
                ("current_date", current_date.as_str()),
            ],
        );
        self.respond(prompt, "response", "Scholarship query").await
    }

    pub async fn ask_preparation(
        &self,
        session: &str,
        timeline: Option<&str>,
        today: NaiveDate,
    ) -> Value {
        let cv_context = self.cv_context(session).await;
        let current_date = today.format(DATE_FORMAT).to_string();
        let prompt = render(
            PREPARATION_PROMPT,
            &[
                ("cv_context", cv_context.as_str()),
                ("timeline", timeline.unwrap_or("next 12 months")),
                ("current_date", current_date.as_str()),
            ],
        );
        self.respond(prompt, "response", "Preparation query").await
    }

    pub async fn compare(
        &self,
        session: &str,
        option1: &str,
        option2: &str,
        criteria: Option<&str>,
    ) -> Value {
        let cv_context = self.cv_context(session).await;
        let prompt = render(
            COMPARE_PROMPT,
            &[
                ("cv_context", cv_context.as_str()),
                ("option1", option1),
                ("option2", option2),
                (
                    "criteria",
                    criteria.unwrap_or("cost, quality, career prospects, admission chances"),
                ),
            ],
        );
        self.respond(prompt, "response", "Comparison").await
    }

    pub async fn summary(&self, session: &str) -> Value {
        let history = self.store.history(session).await;
        if history.is_empty() {
            return json!({ "summary": "No conversation yet" });
        }

        let conversation = history
            .iter()
            .map(|turn| {
                format!(
                    "User: {}\nAssistant: {}\n",
                    turn.user_message, turn.assistant_message
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = render(SUMMARY_PROMPT, &[("conversation", conversation.as_str())]);
        self.respond(prompt, "summary", "Summary").await
    }

    pub async fn clear(&self, session: &str) -> Value {
        self.store.clear_history(session).await;
        json!({ "status": "Conversation cleared" })
    }

    async fn cv_context(&self, session: &str) -> String {
        cv_context_block(self.store.context(session).await.as_ref())
    }

    /// One model call, reply wrapped as `{key: text}`.
    async fn respond(&self, prompt: String, key: &str, action: &str) -> Value {
        match self.llm.complete(CompletionRequest::text(prompt)).await {
            Ok(text) => json!({ key: text }),
            Err(e) => ServiceFault::from(e).into_record(action),
        }
    }
}

/// Replays the last few turns, cutting long assistant replies short.
fn format_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return NO_PREVIOUS_CONVERSATION.to_string();
    }

    let start = history.len().saturating_sub(HISTORY_PROMPT_TURNS);
    history[start..]
        .iter()
        .flat_map(|turn| {
            let excerpt: String = turn
                .assistant_message
                .chars()
                .take(ASSISTANT_EXCERPT_CHARS)
                .collect();
            [
                format!("User: {}", turn.user_message),
                format!("Assistant: {excerpt}..."),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGateway;

    fn service(gateway: Arc<ScriptedGateway>) -> (ChatbotService, ConversationStore) {
        let store = ConversationStore::new();
        (ChatbotService::new(gateway, store.clone()), store)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn test_set_context_then_chat() {
        let gateway = Arc::new(ScriptedGateway::replying("Hey there!"));
        let (chatbot, _) = service(gateway.clone());

        let status = chatbot
            .set_context("s", json!({"academic_analysis": "x"}))
            .await;
        assert_eq!(status, json!({"status": "Context set successfully"}));

        let reply = chatbot.chat("s", "hi").await;
        assert_eq!(reply, json!({"response": "Hey there!", "conversation_id": 1}));

        let prompt = gateway.last_prompt();
        assert!(prompt.contains("\"academic_analysis\": \"x\""));
        assert!(prompt.contains(NO_PREVIOUS_CONVERSATION));
        assert!(prompt.contains("User question: hi"));
    }

    #[tokio::test]
    async fn test_chat_without_context_uses_general_advice() {
        let gateway = Arc::new(ScriptedGateway::replying("ok"));
        let (chatbot, _) = service(gateway.clone());
        chatbot.chat("s", "hello").await;
        assert!(gateway.last_prompt().starts_with(CONTEXT_WITHOUT_CV));
    }

    #[tokio::test]
    async fn test_conversation_id_follows_retention() {
        let gateway = Arc::new(ScriptedGateway::replying("ok"));
        let (chatbot, _) = service(gateway);
        let mut ids = Vec::new();
        for n in 0..11 {
            let reply = chatbot.chat("s", &format!("q{n}")).await;
            ids.push(reply["conversation_id"].as_u64().unwrap());
        }
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 8]);
    }

    #[tokio::test]
    async fn test_failed_chat_is_error_record_and_not_stored() {
        let gateway = Arc::new(ScriptedGateway::failing("upstream down"));
        let (chatbot, store) = service(gateway);
        let reply = chatbot.chat("s", "hi").await;
        assert_eq!(
            reply,
            json!({"error": "Chat error: API error (status 503): upstream down"})
        );
        assert!(store.history("s").await.is_empty());
    }

    #[tokio::test]
    async fn test_history_prompt_replays_last_five_truncated() {
        let gateway = Arc::new(ScriptedGateway::replying("ok"));
        let (chatbot, store) = service(gateway.clone());
        for n in 1..=6 {
            store
                .append_turn("s", ConversationTurn::new(format!("q{n}"), "a".repeat(300)))
                .await;
        }

        chatbot.chat("s", "next").await;
        let prompt = gateway.last_prompt();
        assert!(!prompt.contains("User: q1\n"));
        assert!(prompt.contains("User: q2\n"));
        assert!(prompt.contains(&format!("Assistant: {}...", "a".repeat(200))));
        assert!(!prompt.contains(&"a".repeat(201)));
    }

    #[test]
    fn test_format_history_handles_multibyte_replies() {
        let turns = vec![ConversationTurn::new("q", "é".repeat(250))];
        let formatted = format_history(&turns);
        assert_eq!(formatted, format!("User: q\nAssistant: {}...", "é".repeat(200)));
    }

    #[tokio::test]
    async fn test_ask_universities_defaults() {
        let gateway = Arc::new(ScriptedGateway::replying("UI is great"));
        let (chatbot, _) = service(gateway.clone());
        let reply = chatbot
            .ask_universities("s", "Universitas Indonesia", None)
            .await;
        assert_eq!(reply, json!({"response": "UI is great"}));

        let prompt = gateway.last_prompt();
        assert!(prompt.contains("detailed information about Universitas Indonesia"));
        assert!(prompt.contains("CV Context: No CV context available"));
        assert!(prompt.contains("Specific question: General information about this university"));
    }

    #[tokio::test]
    async fn test_ask_scholarships_and_preparation_include_date() {
        let gateway = Arc::new(ScriptedGateway::replying("plan"));
        let (chatbot, _) = service(gateway.clone());

        chatbot
            .ask_scholarships("s", None, Some("Japan"), today())
            .await;
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Scholarship focus: all types"));
        assert!(prompt.contains("Target country: Japan"));
        assert!(prompt.contains("Current date: 2025-07-01"));

        chatbot.ask_preparation("s", None, today()).await;
        assert!(gateway.last_prompt().contains("Timeline: next 12 months"));
    }

    #[tokio::test]
    async fn test_compare_failure_uses_comparison_action() {
        let gateway = Arc::new(ScriptedGateway::failing("boom"));
        let (chatbot, _) = service(gateway);
        let reply = chatbot.compare("s", "TU Delft", "NUS", None).await;
        assert_eq!(
            reply,
            json!({"error": "Comparison error: API error (status 503): boom"})
        );
    }

    #[tokio::test]
    async fn test_summary_without_history_skips_model() {
        let gateway = Arc::new(ScriptedGateway::replying("unused"));
        let (chatbot, _) = service(gateway.clone());
        assert_eq!(
            chatbot.summary("s").await,
            json!({"summary": "No conversation yet"})
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_sends_full_history() {
        let gateway = Arc::new(ScriptedGateway::replying("You asked about Germany."));
        let (chatbot, store) = service(gateway.clone());
        store
            .append_turn("s", ConversationTurn::new("Germany?", "Free tuition."))
            .await;

        let summary = chatbot.summary("s").await;
        assert_eq!(summary, json!({"summary": "You asked about Germany."}));
        assert!(gateway
            .last_prompt()
            .contains("User: Germany?\nAssistant: Free tuition.\n"));
    }

    #[tokio::test]
    async fn test_clear_empties_history() {
        let gateway = Arc::new(ScriptedGateway::replying("ok"));
        let (chatbot, store) = service(gateway);
        chatbot.chat("s", "hi").await;
        assert_eq!(
            chatbot.clear("s").await,
            json!({"status": "Conversation cleared"})
        );
        assert!(store.history("s").await.is_empty());
    }
}
