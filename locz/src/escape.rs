//! Markup escaping for resource values.

use std::borrow::Cow;

/// Replaces `&`, `<`, `>`, `"` and `'` with their XML entities.
///
/// Each input character is inspected once, so the `&` of an entity produced
/// here is never escaped again. Returns the input unchanged (borrowed) when
/// there is nothing to replace.
pub fn escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}
