//! # Small string helpers used in log and assertion output.

/// Prefix added by [`indent`].
const INDENT: &str = "    ";

/// Indents every line of `s` by four spaces.
///
/// Empty input stays empty.
///
/// # Example
/// ```
/// use sigvisor::text::indent;
///
/// assert_eq!(indent("a\nb"), "    a\n    b");
/// assert_eq!(indent(""), "");
/// ```
pub fn indent(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(s.len() + INDENT.len());
    out.push_str(INDENT);
    out.push_str(&s.replace('\n', &format!("\n{INDENT}")));
    out
}

/// Quotes each item (escaping quotes, backslashes and control characters)
/// and joins them with `sep`. The input is left untouched.
///
/// # Example
/// ```
/// use sigvisor::text::quote_join;
///
/// assert_eq!(quote_join(&["a", "b\"c"], ", "), r#""a", "b\"c""#);
/// ```
pub fn quote_join<S: AsRef<str>>(items: &[S], sep: &str) -> String {
    items
        .iter()
        .map(|s| format!("{:?}", s.as_ref()))
        .collect::<Vec<_>>()
        .join(sep)
}
