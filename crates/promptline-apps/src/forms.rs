//! Form schemas and submission validation.

use std::collections::HashMap;

use promptline_core::PipelineError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Substituted for a file field with no uploads.
pub const NO_DOCUMENTS: &str = "No documents uploaded";

/// Widget kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Files,
}

/// A single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Input name the field fills.
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Allowed values for select and radio fields, first one is the default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn textarea(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Textarea)
    }

    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self::new(name, label, FieldKind::Select).with_options(options)
    }

    pub fn radio(name: &str, label: &str, options: &[&str]) -> Self {
        Self::new(name, label, FieldKind::Radio).with_options(options)
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn files(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Files)
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    fn invalid(&self, message: impl Into<String>) -> PipelineError {
        PipelineError::InvalidInput {
            field: self.name.clone(),
            message: message.into(),
        }
    }

    /// Converts a submitted value (or its absence) into the text substituted into prompts.
    fn normalize(&self, value: Option<&FormValue>) -> Result<String, PipelineError> {
        match self.kind {
            FieldKind::Text | FieldKind::Textarea => {
                let text = match value {
                    None => String::new(),
                    Some(FormValue::Text(s)) => s.clone(),
                    Some(_) => return Err(self.invalid("expected text")),
                };
                if self.required && text.trim().is_empty() {
                    return Err(PipelineError::MissingInput(self.name.clone()));
                }
                Ok(text)
            }
            FieldKind::Select | FieldKind::Radio => match value {
                None => self
                    .options
                    .first()
                    .cloned()
                    .ok_or_else(|| PipelineError::MissingInput(self.name.clone())),
                Some(FormValue::Text(s)) if self.options.contains(s) => Ok(s.clone()),
                Some(FormValue::Text(s)) => Err(self.invalid(format!("'{}' is not one of {:?}", s, self.options))),
                Some(_) => Err(self.invalid("expected one of the listed options")),
            },
            FieldKind::Checkbox => match value {
                None => Ok("false".to_string()),
                Some(FormValue::Flag(b)) => Ok(b.to_string()),
                Some(_) => Err(self.invalid("expected true or false")),
            },
            FieldKind::Files => {
                let names: Vec<&str> = match value {
                    None => Vec::new(),
                    Some(FormValue::Files(names)) => names
                        .iter()
                        .map(|n| n.trim())
                        .filter(|n| !n.is_empty())
                        .collect(),
                    Some(FormValue::Text(name)) if name.trim().is_empty() => Vec::new(),
                    Some(FormValue::Text(name)) => vec![name.trim()],
                    Some(_) => return Err(self.invalid("expected a list of file names")),
                };
                if names.is_empty() {
                    if self.required {
                        return Err(PipelineError::MissingInput(self.name.clone()));
                    }
                    return Ok(NO_DOCUMENTS.to_string());
                }
                Ok(names.join(", "))
            }
        }
    }
}

/// A submitted form value as received over JSON.
///
/// Files are represented by their names; their contents are never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Flag(bool),
    Files(Vec<String>),
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

/// Raw form submission keyed by field name.
pub type Submission = HashMap<String, FormValue>;

/// Ordered list of fields shown for an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub fields: Vec<FieldSpec>,
}

impl FormSpec {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Returns the names of all fields, in display order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Validates a submission and returns the text value of every field.
    ///
    /// Fields are checked in display order, so the first offending field is
    /// the one reported. Unknown keys are ignored.
    pub fn validate(&self, submission: &Submission) -> Result<HashMap<String, String>, PipelineError> {
        for key in submission.keys().filter(|k| !self.fields.iter().any(|f| &f.name == *k)) {
            debug!("Ignoring unknown form field '{}'", key);
        }

        self.fields
            .iter()
            .map(|field| {
                field
                    .normalize(submission.get(&field.name))
                    .map(|value| (field.name.clone(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormSpec {
        FormSpec::new(vec![
            FieldSpec::text("theme", "Theme").required(),
            FieldSpec::textarea("notes", "Notes"),
            FieldSpec::select("area", "Area", &["Civil", "Labor"]),
            FieldSpec::checkbox("attach", "Attach"),
            FieldSpec::files("docs", "Documents"),
        ])
    }

    fn submit(pairs: Vec<(&str, FormValue)>) -> Submission {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn fills_defaults_for_absent_optional_fields() {
        let values = form().validate(&submit(vec![("theme", "tenancy".into())])).unwrap();
        assert_eq!(values["theme"], "tenancy");
        assert_eq!(values["notes"], "");
        assert_eq!(values["area"], "Civil");
        assert_eq!(values["attach"], "false");
        assert_eq!(values["docs"], NO_DOCUMENTS);
    }

    #[test]
    fn blank_required_field_is_missing() {
        let err = form().validate(&submit(vec![("theme", "   ".into())])).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(f) if f == "theme"));
    }

    #[test]
    fn first_missing_field_in_display_order_is_reported() {
        let form = FormSpec::new(vec![
            FieldSpec::text("kind", "Kind").required(),
            FieldSpec::textarea("facts", "Facts").required(),
        ]);
        let err = form.validate(&Submission::new()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(f) if f == "kind"));
    }

    #[test]
    fn selection_must_be_an_option() {
        let err = form()
            .validate(&submit(vec![("theme", "x".into()), ("area", "Maritime".into())]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { field, .. } if field == "area"));
    }

    #[test]
    fn file_names_are_comma_joined() {
        let values = form()
            .validate(&submit(vec![
                ("theme", "x".into()),
                ("docs", FormValue::Files(vec!["lease.pdf".into(), " ".into(), "id.png".into()])),
                ("attach", FormValue::Flag(true)),
            ]))
            .unwrap();
        assert_eq!(values["docs"], "lease.pdf, id.png");
        assert_eq!(values["attach"], "true");
    }

    #[test]
    fn submission_deserializes_from_json() {
        let submission: Submission =
            serde_json::from_str(r#"{"theme":"x","attach":true,"docs":["a.pdf"]}"#).unwrap();
        assert_eq!(submission["attach"], FormValue::Flag(true));
        assert_eq!(submission["docs"], FormValue::Files(vec!["a.pdf".into()]));
    }
}
