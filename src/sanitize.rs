//! Markdown stripping for model output.
//!
//! Models sometimes decorate the commit message with emphasis, code spans or
//! list markers even when asked for plain text. [`strip_markdown`] removes
//! those constructs while keeping the words they wrap.

use std::sync::LazyLock;

use regex_lite::Regex;

struct Pass {
    re: Regex,
    replacement: &'static str,
}

impl Pass {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            re: Regex::new(pattern).expect("Invalid regex"),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.re.replace_all(text, self.replacement).into_owned()
    }
}

/// Ordered passes, one per construct class.
static PASSES: LazyLock<Vec<Pass>> = LazyLock::new(|| {
    vec![
        // ```lang\ncode``` and ```code```
        Pass::new(r"(?s)```(?:[A-Za-z0-9_+-]*\n)?(.*?)```", "$1"),
        // `code`
        Pass::new(r"`([^`\n]+)`", "$1"),
        // ![alt](url) goes away entirely, before links see it
        Pass::new(r"!\[[^\]\n]*\]\([^)\n]*\)", ""),
        // [text](url)
        Pass::new(r"\[([^\]\n]*)\]\([^)\n]*\)", "$1"),
        // ---, ***, ___ (spaces allowed) on a line of their own
        Pass::new(
            r"(?m)^[ \t]*(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})(?:\n|$)",
            "",
        ),
        // Leading "# ", "> ", "- ", "1. " markers, the whole run at once
        Pass::new(
            r"(?m)^(?:[ \t]*(?:#+[ \t]*|>+[ \t]*|(?:[-*+]|\d+\.)[ \t]+))+",
            "",
        ),
        // **bold**
        Pass::new(r"\*\*(\S(?:.*?\S)?)\*\*", "$1"),
        // __bold__
        Pass::new(r"\b__(\S(?:.*?\S)?)__\b", "$1"),
        // *italic*
        Pass::new(r"\*(\S(?:.*?\S)?)\*", "$1"),
        // _italic_, not inside snake_case words
        Pass::new(r"\b_(\S(?:.*?\S)?)_\b", "$1"),
    ]
});

/// Remove markdown formatting from `text`, keeping the underlying words.
///
/// The passes are re-run until the text stops changing, so the result is a
/// fixed point: `strip_markdown(strip_markdown(x)) == strip_markdown(x)`.
/// Every pass only removes characters, so each changing round shortens the
/// text and the loop ends.
pub fn strip_markdown(text: &str) -> String {
    let mut current = text.trim().to_string();

    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(text: &str) -> String {
    let stripped = PASSES
        .iter()
        .fold(text.to_string(), |acc, pass| pass.apply(&acc));
    stripped.trim().to_string()
}
