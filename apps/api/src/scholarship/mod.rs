// Scholarship planning: departure-anchored timelines, university lookups and search.
// Date arithmetic lives in crate::timeline; everything else is one LLM call per request.

pub mod handlers;
pub mod prompts;
pub mod service;

pub use service::ScholarshipService;
