/// Strip a markdown code fence wrapped around a JSON payload.
///
/// Models asked for JSON sometimes answer with `` ```json ... ``` ``; the fence
/// line (with any language tag) and the closing fence are removed.
#[must_use]
pub fn strip_markdown_json(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```").and_then(|s| s.strip_suffix("```")) else {
        return trimmed;
    };
    match inner.split_once('\n') {
        Some((_tag, body)) => body.trim(),
        None => inner.trim(),
    }
}
