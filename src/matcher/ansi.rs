use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// ESC, then anything up to the next `m`. Covers SGR color/style codes, which is what
/// kernels and QEMU firmware print; other sequences ending before an `m` are eaten too.
fn escape_regex() -> &'static Regex {
    static ESCAPE: OnceLock<Regex> = OnceLock::new();
    ESCAPE.get_or_init(|| Regex::new("\x1b[^m]*m").expect("escape pattern is valid"))
}

/// Remove terminal escape sequences from one console line.
pub fn strip_escapes(line: &str) -> Cow<'_, str> {
    if !line.contains('\x1b') {
        return Cow::Borrowed(line);
    }
    escape_regex().replace_all(line, "")
}

/// Turn one raw output line into the text stored in the output log.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let text = String::from_utf8_lossy(raw);
    strip_escapes(&text).into_owned()
}
