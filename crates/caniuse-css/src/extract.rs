//! Token extraction for caniuse-css.
//!
//! Turns the editor line under the cursor into an attribute candidate. This
//! is purely lexical: `"flex-wrap: wrap;"` yields `"flex-wrap"` whether or
//! not `flex-wrap` is a real property.

/// Extract the attribute candidate from a line of text.
///
/// Takes everything before the first `:` (or the whole line when there is
/// none) and trims surrounding whitespace.
pub fn extract_attribute(line: &str) -> String {
    let head = match line.split_once(':') {
        Some((head, _)) => head,
        None => line,
    };
    head.trim().to_string()
}
