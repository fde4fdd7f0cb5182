use crate::parsers::{Cursor, InlineParser, InlineProcessor};
use crate::registry::Component;
use crate::syntax::{Inline, Link, LinkKind};

/// Angle-bracket auto-links: `<https://example.com>` and `<user@example.com>`.
#[derive(Debug, Default)]
pub struct AutolinkParser;

impl Component for AutolinkParser {}

impl InlineParser for AutolinkParser {
    fn opening_chars(&self) -> &[char] {
        &['<']
    }

    fn try_match(&self, _processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
        cursor.bump();
        let rest = cursor.rest();
        let end = rest.find(|c: char| c == '>' || c == '<' || c.is_whitespace() || c.is_control())?;
        if !rest[end..].starts_with('>') {
            return None;
        }
        let target = &rest[..end];

        let url = if is_uri(target) {
            target.to_owned()
        } else if is_email(target) {
            format!("mailto:{target}")
        } else {
            return None;
        };

        cursor.bump_bytes(end + 1);
        Some(Inline::Link(Link {
            url,
            title: None,
            kind: LinkKind::Autolink,
            children: vec![Inline::text(target)],
        }))
    }
}

/// `scheme:rest` with a scheme of 2-32 characters.
fn is_uri(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    (2..=32).contains(&scheme.len())
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

fn is_email(target: &str) -> bool {
    let Some((local, domain)) = target.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c))
        && !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
