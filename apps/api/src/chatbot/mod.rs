// Study-abroad chatbot: session-scoped chat plus focused Q&A helpers.
// Conversation state lives in conversation::ConversationStore.

pub mod handlers;
pub mod prompts;
pub mod service;

pub use service::ChatbotService;
