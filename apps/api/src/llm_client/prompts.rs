// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

use serde_json::Value;

/// Appended to every prompt whose completion is run through the response extractor.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond with valid JSON only, exactly matching the structure above. \
Do NOT include any text outside the JSON object. \
Do NOT use markdown code fences. \
Use null for anything you cannot determine instead of inventing it.";

pub const NO_CV_CONTEXT: &str = "No CV context available";

/// Pretty-printed CV analysis, or a placeholder when none has been set.
pub fn cv_context_block(cv_context: Option<&Value>) -> String {
    cv_context
        .and_then(|ctx| serde_json::to_string_pretty(ctx).ok())
        .unwrap_or_else(|| NO_CV_CONTEXT.to_string())
}

/// Substitutes `{name}` placeholders in a template in a single pass.
/// Braces that do not form a known placeholder are copied through, so literal
/// JSON in templates survives, and substituted values are never re-expanded.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let matched = vars.iter().find(|(name, _)| {
            after
                .strip_prefix(name)
                .is_some_and(|tail| tail.starts_with('}'))
        });
        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
