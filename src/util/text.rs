use std::borrow::Cow;

/// Returns true for characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Strip characters that cannot appear in an XML 1.0 document, even escaped.
///
/// Upstream titles and self text occasionally carry raw control characters
/// (form feeds, BEL, NUL). Escaping does not help for these, so they are
/// dropped.
///
/// Strips:
/// - ASCII control chars: 0x00-0x08, 0x0B-0x0C, 0x0E-0x1F
/// - The non-characters U+FFFE and U+FFFF
///
/// Preserves: tab (0x09), newline (0x0A), carriage return (0x0D).
///
/// Returns `Cow::Borrowed` when the input is already clean (common case).
///
/// # Examples
///
/// ```
/// use subfeed::util::strip_invalid_xml_chars;
///
/// assert_eq!(strip_invalid_xml_chars("plain"), "plain");
/// assert_eq!(strip_invalid_xml_chars("a\u{0}b\u{c}c"), "abc");
/// ```
pub fn strip_invalid_xml_chars(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|&c| is_xml_char(c)).collect())
}
