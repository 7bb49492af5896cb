//! Cleaning and encoding of user supplied text

/// Remove control characters from user text.
///
/// Tabs become spaces. Line breaks survive only when `keep_line_breaks` is
/// set, otherwise they become spaces too.
pub fn sanitize(text: &str, keep_line_breaks: bool) -> String {
    let text = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' if keep_line_breaks => out.push('\n'),
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Encode text for the standard Helvetica fonts under WinAnsiEncoding.
///
/// Latin-1 maps directly; a handful of common typographic characters map to
/// their WinAnsi slots and anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

/// Escape user text for the Markdown summary.
///
/// HTML is entity-encoded first, then Markdown punctuation that could start
/// emphasis, links, headings or table cells is backslash-escaped.
pub fn escape_markdown(text: &str) -> String {
    let encoded = html_escape::encode_text(text);
    let mut out = String::with_capacity(encoded.len());
    for c in encoded.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '(' | ')' | '#' | '|' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_control_characters() {
        assert_eq!(sanitize("a\u{0}b\u{7}c", false), "abc");
        assert_eq!(sanitize("tab\there", false), "tab here");
    }

    #[test]
    fn sanitize_handles_line_breaks() {
        assert_eq!(sanitize("one\r\ntwo\nthree", true), "one\ntwo\nthree");
        assert_eq!(sanitize("one\r\ntwo", false), "one two");
    }

    #[test]
    fn win_ansi_keeps_latin1_and_replaces_the_rest() {
        assert_eq!(encode_win_ansi("Caf\u{e9}"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{20ac}5"), vec![0x80, b'5']);
        assert_eq!(encode_win_ansi("\u{65e5}"), vec![b'?']);
    }

    #[test]
    fn markdown_escaping_neutralizes_markup() {
        assert_eq!(
            escape_markdown("<script>alert(1)</script>"),
            "&lt;script&gt;alert\\(1\\)&lt;/script&gt;"
        );
        assert_eq!(escape_markdown("**bold** | cell"), "\\*\\*bold\\*\\* \\| cell");
        assert_eq!(escape_markdown("plain text"), "plain text");
    }
}
