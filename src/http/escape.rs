/// Escapes text for safe inclusion in an HTML body or attribute.
///
/// ```
/// # use searchd::http::escape::escape_html;
/// assert_eq!(escape_html("<b>\"a\" & 'b'</b>"),
///            "&lt;b&gt;&quot;a&quot; &amp; &apos;b&apos;&lt;/b&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
