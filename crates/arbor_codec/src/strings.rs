//! Text helpers: condensed array escaping and environment expansion.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

const SEPARATOR: char = ',';
const ESCAPE: char = '\\';

/// Escapes one condensed element. `None` is the null element.
pub(crate) fn protect(value: Option<&str>, out: &mut String) {
    let Some(value) = value else {
        return;
    };
    if value.is_empty() {
        out.push_str("\\_");
        return;
    }
    for c in value.chars() {
        match c {
            ESCAPE => out.push_str("\\\\"),
            SEPARATOR => out.push_str("\\`"),
            c => out.push(c),
        }
    }
}

/// Joins escaped elements into a condensed body.
pub(crate) fn join_condensed<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let mut out = String::new();
    for (index, value) in values.into_iter().enumerate() {
        if index > 0 {
            out.push(SEPARATOR);
        }
        protect(value, &mut out);
    }
    out
}

/// Splits a condensed body back into its elements.
///
/// An empty body holds no elements. Unknown escapes keep the escaped
/// character.
pub(crate) fn split_condensed(body: &str) -> Vec<Option<String>> {
    if body.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut explicit_empty = false;
    let mut chars = body.chars();

    let mut finish = |current: &mut String, explicit_empty: &mut bool| {
        let item = if current.is_empty() && !*explicit_empty {
            None
        } else {
            Some(core::mem::take(current))
        };
        *explicit_empty = false;
        items.push(item);
    };

    while let Some(c) = chars.next() {
        match c {
            SEPARATOR => finish(&mut current, &mut explicit_empty),
            ESCAPE => match chars.next() {
                Some('_') => explicit_empty = true,
                Some('`') => current.push(SEPARATOR),
                Some(other) => current.push(other),
                None => current.push(ESCAPE),
            },
            c => current.push(c),
        }
    }
    finish(&mut current, &mut explicit_empty);
    items
}

/// Replaces `%NAME%` with the value of the environment variable `NAME`.
///
/// Unknown names are kept verbatim, and their closing `%` may open the
/// next reference.
pub(crate) fn expand_environment(text: &str) -> Cow<'_, str> {
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('%') else {
            rest = &rest[start..];
            break;
        };
        let name = &after[..end];
        match std::env::var(name) {
            Ok(value) if !name.is_empty() => {
                out.push_str(&value);
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                out.push_str(name);
                rest = &after[end..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::{expand_environment, join_condensed, split_condensed};

    #[test]
    fn condensed_keeps_empty_and_null_apart() {
        let body = join_condensed([Some("a,b"), Some(""), None, Some("c")]);
        assert_eq!(body, "a\\`b,\\_,,c");
        assert_eq!(
            split_condensed(&body),
            [Some("a,b".into()), Some(String::new()), None, Some("c".into())]
        );
    }

    #[test]
    fn condensed_escapes_backslashes() {
        let body = join_condensed([Some("C:\\dir"), Some("\\_")]);
        assert_eq!(split_condensed(&body), [Some("C:\\dir".into()), Some("\\_".into())]);
    }

    #[test]
    fn empty_body_has_no_elements() {
        assert!(split_condensed("").is_empty());
        assert_eq!(split_condensed(","), [None, None]);
        assert_eq!(join_condensed([None]), "");
    }

    #[test]
    fn unknown_variables_are_left_alone() {
        assert_eq!(expand_environment("plain"), "plain");
        assert_eq!(
            expand_environment("%ARBOR_SURELY_UNSET_VAR% 50%"),
            "%ARBOR_SURELY_UNSET_VAR% 50%"
        );
        assert_eq!(expand_environment("100%%"), "100%%");
    }

    #[test]
    fn known_variables_expand() {
        let Ok(path) = std::env::var("PATH") else {
            return;
        };
        assert_eq!(expand_environment("<%PATH%>"), format!("<{path}>"));
    }
}
