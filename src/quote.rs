//! POSIX shell quoting helpers for building remote command lines.

/// Quote a single shell word. Words made only of characters the
/// shell never interprets are returned unchanged; anything else
/// is wrapped in single quotes.
///
/// ```
/// use pypln_deploy::quote::shell_quote;
///
/// assert_eq!(shell_quote("/srv/pypln/.pgpass"), "/srv/pypln/.pgpass");
/// assert_eq!(shell_quote("it's"), r"'it'\''s'");
/// ```
#[must_use]
pub fn shell_quote(word: &str) -> String {
    if !word.is_empty() && word.chars().all(is_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Escape a string for embedding inside double quotes.
#[must_use]
pub fn escape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape extended-regex metacharacters so `text` matches
/// literally under `grep -E`.
#[must_use]
pub fn escape_regex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

const fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}
