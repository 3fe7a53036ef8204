//! Output escaping for rendered content.
//!
//! Mirrors the host's `htmlspecialchars` (quotes included, single quote as
//! `&#039;`) and `nl2br` (XHTML `<br />`, line breaks kept).

/// Markup inserted before every line break by [`nl2br`].
pub const LINE_BREAK_TAG: &str = "<br />";

/// Escape the five HTML special characters.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Insert `<br />` before each line break.
///
/// `\r\n` and `\n\r` count as a single break.
pub fn nl2br(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                out.push_str(LINE_BREAK_TAG);
                out.push(c);
                let pair = if c == '\r' { '\n' } else { '\r' };
                if chars.peek() == Some(&pair) {
                    out.push(pair);
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escape rendered content for display as text.
pub fn escape_rendered(s: &str) -> String {
    nl2br(&html_escape(s))
}
