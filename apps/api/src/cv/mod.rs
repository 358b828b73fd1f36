// CV analysis: text, image and PDF CVs in, structured recommendations out.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod analyzer;
pub mod document;
pub mod handlers;
pub mod prompts;
