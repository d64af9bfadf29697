// src/render/compose.rs

use std::borrow::Cow;

/// Source text starting with this marker is written without the prepend text.
///
/// Leading whitespace before the marker is ignored.
pub const NO_PREPEND_MARKER: &str = "// nicescad:no-prepend";

pub fn has_no_prepend_marker(source: &str) -> bool {
    source.trim_start().starts_with(NO_PREPEND_MARKER)
}

/// Build the text for the scratch source file.
///
/// Returns `prepend` followed by `source`, or `source` untouched when the
/// caller opted out or the source carries [`NO_PREPEND_MARKER`].
pub fn compose_source<'a>(prepend: &str, source: &'a str, no_prepend: bool) -> Cow<'a, str> {
    if no_prepend || prepend.is_empty() || has_no_prepend_marker(source) {
        Cow::Borrowed(source)
    } else {
        let mut text = String::with_capacity(prepend.len() + source.len());
        text.push_str(prepend);
        text.push_str(source);
        Cow::Owned(text)
    }
}
