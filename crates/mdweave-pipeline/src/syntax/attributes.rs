//! HTML attributes attached to syntax nodes.
//!
//! Parsed from the `{#id .class key="value"}` suffix accepted by custom
//! containers, and written back by both renderers.

/// Id, classes and ordered key/value properties of a node.
///
/// # Example
///
/// ```
/// use mdweave_pipeline::syntax::HtmlAttributes;
///
/// let attrs = HtmlAttributes::parse(r#"#intro .note .wide lang="en""#);
/// assert_eq!(attrs.id.as_deref(), Some("intro"));
/// assert_eq!(attrs.classes, vec!["note", "wide"]);
/// assert_eq!(attrs.get("lang"), Some("en"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlAttributes {
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Key/value pairs in source order.
    pub properties: Vec<(String, String)>,
}

impl HtmlAttributes {
    /// Parse the inside of an attribute block (without braces).
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut attrs = Self::default();
        let mut remaining = source.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some(rest) = remaining.strip_prefix('#') {
                let end = name_end(rest);
                attrs.id = Some(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = name_end(rest);
                attrs.add_class(&rest[..end]);
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                attrs.properties.push((key.to_owned(), value.to_owned()));
                remaining = rest;
            } else {
                let skip = remaining.chars().next().map_or(0, char::len_utf8);
                remaining = &remaining[skip..];
            }
        }

        attrs
    }

    /// Parse a trailing `{...}` block from `text`.
    ///
    /// Returns the text before the block and the parsed attributes, or
    /// `None` if `text` does not end with a brace-delimited block.
    #[must_use]
    pub fn split_trailing(text: &str) -> Option<(&str, Self)> {
        let trimmed = text.trim_end();
        let inner = trimmed.strip_suffix('}')?;
        let open = inner.rfind('{')?;
        Some((inner[..open].trim_end(), Self::parse(&inner[open + 1..])))
    }

    /// Add a class unless it is empty or already present.
    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Value of the first property named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no id, class or property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.properties.is_empty()
    }

    /// Reconstruct the `{...}` source form, or an empty string when empty.
    #[must_use]
    pub fn to_syntax(&self) -> String {
        let mut parts = Vec::new();
        if let Some(id) = &self.id {
            parts.push(format!("#{id}"));
        }
        for class in &self.classes {
            parts.push(format!(".{class}"));
        }
        for (key, value) in &self.properties {
            let escaped = value.replace('"', r#"\""#);
            parts.push(format!(r#"{key}="{escaped}""#));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", parts.join(" "))
        }
    }
}

fn name_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse `key="value"`, `key='value'` or `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    for quote in ['"', '\''] {
        if let Some(stripped) = after_eq.strip_prefix(quote) {
            let end = stripped.find(quote)?;
            return Some((key, &stripped[..end], &stripped[end + 1..]));
        }
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    Some((key, &after_eq[..end], &after_eq[end..]))
}
