//! Template Renderer - literal `{name}` placeholder substitution
//!
//! Substitution is plain substring replacement, not a template engine.
//! Placeholders missing from the value map stay in the output untouched,
//! and a replacement value is never expanded for its own key again.

use std::collections::HashMap;

/// Render a template by replacing every `{name}` token with its mapped value
///
/// Each key `name` is replaced as the literal substring `{name}`. Unknown
/// placeholders are left as-is. Keys are expected to be disjoint
/// identifiers; a replacement value that inserts another key's placeholder
/// may or may not be expanded depending on map iteration order. This is the
/// known sharp edge of literal substitution.
pub fn render(template: &str, values: &HashMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in values {
        rendered = rendered.replace(&format!("{{{}}}", key), value);
    }
    rendered
}
