//! Named prompt templates with `{placeholder}` substitution.
//!
//! Placeholders are identifiers wrapped in single braces. `{{` and `}}` produce
//! literal braces. The placeholder set is parsed once at construction, and
//! rendering requires a value for every one of them.

use std::collections::{BTreeSet, HashMap};

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors produced while parsing or rendering a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template text could not be parsed.
    #[error("Malformed template '{template}': {message}")]
    Malformed { template: String, message: String },

    /// A placeholder had no value in the supplied mapping.
    #[error("Template '{template}' is missing a value for '{placeholder}'")]
    MissingPlaceholder { template: String, placeholder: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// An immutable prompt template identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    text: String,
    segments: Vec<Segment>,
    placeholders: BTreeSet<String>,
}

impl PromptTemplate {
    /// Parses a template, collecting its placeholder set.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Result<Self, TemplateError> {
        let name = name.into();
        let text = text.into();
        let segments = parse(&name, &text)?;
        let placeholders = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(p) => Some(p.clone()),
                Segment::Literal(_) => None,
            })
            .collect();

        Ok(Self { name, text, segments, placeholders })
    }

    /// Template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names referenced by the template.
    pub fn placeholders(&self) -> &BTreeSet<String> {
        &self.placeholders
    }

    /// Substitutes every placeholder from `values`.
    ///
    /// Values are inserted verbatim. Keys not referenced by the template are ignored.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.text.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder(p) => {
                    let value = values.get(p).ok_or_else(|| TemplateError::MissingPlaceholder {
                        template: self.name.clone(),
                        placeholder: p.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl Serialize for PromptTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

fn is_placeholder_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse(name: &str, text: &str) -> Result<Vec<Segment>, TemplateError> {
    let malformed = |message: String| TemplateError::Malformed {
        template: name.to_string(),
        message,
    };

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|(_, n)| *n) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().map(|(_, n)| *n) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(malformed(format!("unmatched '}}' at byte {}", pos))),
            '{' => {
                let mut placeholder = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(n);
                }
                if !closed {
                    return Err(malformed(format!("unclosed '{{' at byte {}", pos)));
                }
                if placeholder.is_empty() || !placeholder.chars().all(is_placeholder_char) {
                    return Err(malformed(format!("invalid placeholder '{{{}}}'", placeholder)));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(placeholder));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn collects_placeholders_once() {
        let t = PromptTemplate::new("exploration", "With \"{theme}\" ({theme_research_results}), list aspects of \"{theme}\".").unwrap();
        let names: Vec<&str> = t.placeholders().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["theme", "theme_research_results"]);
    }

    #[test]
    fn renders_with_complete_mapping() {
        let t = PromptTemplate::new("poa", "Generate a Power of Attorney document based on the given facts: {facts}").unwrap();
        let out = t.render(&values(&[("facts", "client owns a house")])).unwrap();
        assert_eq!(out, "Generate a Power of Attorney document based on the given facts: client owns a house");
        assert!(!out.contains('{'));
    }

    #[test]
    fn missing_value_is_an_error_not_empty_string() {
        let t = PromptTemplate::new("draft", "Facts: {facts}\nDocs: {docs}").unwrap();
        let err = t.render(&values(&[("facts", "x")])).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholder { template: "draft".into(), placeholder: "docs".into() }
        );
    }

    #[test]
    fn extra_values_are_ignored() {
        let t = PromptTemplate::new("t", "{a}").unwrap();
        assert_eq!(t.render(&values(&[("a", "1"), ("b", "2")])).unwrap(), "1");
    }

    #[test]
    fn values_are_not_re_expanded() {
        let t = PromptTemplate::new("t", "Info: {information}").unwrap();
        let out = t.render(&values(&[("information", "{company}")])).unwrap();
        assert_eq!(out, "Info: {company}");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let t = PromptTemplate::new("json", "Respond with {{\"ok\": true}} for {topic}").unwrap();
        assert_eq!(t.placeholders().len(), 1);
        assert_eq!(t.render(&values(&[("topic", "x")])).unwrap(), "Respond with {\"ok\": true} for x");
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(PromptTemplate::new("t", "open {theme"), Err(TemplateError::Malformed { .. })));
        assert!(matches!(PromptTemplate::new("t", "stray } brace"), Err(TemplateError::Malformed { .. })));
        assert!(matches!(PromptTemplate::new("t", "empty {} slot"), Err(TemplateError::Malformed { .. })));
        assert!(matches!(PromptTemplate::new("t", "bad {the me}"), Err(TemplateError::Malformed { .. })));
    }

    #[test]
    fn template_without_placeholders_renders_verbatim() {
        let t = PromptTemplate::new("plain", "Hello there.").unwrap();
        assert!(t.placeholders().is_empty());
        assert_eq!(t.render(&HashMap::new()).unwrap(), "Hello there.");
    }
}
