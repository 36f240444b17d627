//! JSON object extraction from model text.
//!
//! Structured replies are normally bare JSON, but a model can still wrap the
//! object in a markdown fence or a sentence of prose. These helpers locate
//! the first complete JSON object in such text.

/// Return the first JSON object embedded in `text`, if any.
///
/// Checks, in order:
/// 1. the whole (trimmed) text
/// 2. the body of a ` ```json ` or bare ` ``` ` fence
/// 3. every `{` in the text, cut at its matching `}`
pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if is_json_object(trimmed) {
        return Some(trimmed.to_string());
    }

    if let Some(inner) = fenced_body(trimmed)
        && is_json_object(inner)
    {
        return Some(inner.to_string());
    }

    trimmed
        .match_indices('{')
        .filter_map(|(start, _)| balanced_object(&trimmed[start..]))
        .find(|candidate| is_json_object(candidate))
        .map(str::to_string)
}

fn is_json_object(candidate: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(candidate),
        Ok(serde_json::Value::Object(_))
    )
}

/// Body of the first fenced block, without an optional `json` tag.
fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Cut `text` (which starts with `{`) at the brace that closes it.
///
/// Braces inside JSON string literals, including escaped quotes, are
/// ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}
