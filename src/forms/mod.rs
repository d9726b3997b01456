//! Dynamic form builder and request serialization.
//!
//! [`build_form`] turns a model key into render instructions for its input
//! form. [`FormState`] holds the live values of a rendered form and turns
//! them into the flat feature mapping the backend expects.

pub mod schema;

use serde::Serialize;
use serde_json::Value;

pub use schema::{FieldKind, FieldSpec, schema_for};

use crate::api::Features;
use crate::catalog::ModelKey;

/// Render instructions for a model's input form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum FormView {
    /// No schema exists for the selected model.
    Unavailable,
    Fields(Vec<FieldView>),
}

impl FormView {
    /// Number of controls the form renders.
    pub fn input_count(&self) -> usize {
        match self {
            Self::Unavailable => 0,
            Self::Fields(fields) => fields.len(),
        }
    }
}

/// One rendered form control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub control: Control,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Select {
        options: Vec<&'static str>,
        value: String,
    },
    Number {
        value: String,
        step: String,
        required: bool,
    },
    Text {
        value: String,
        required: bool,
    },
}

/// Build the form for a model with its example defaults filled in.
///
/// `None` (a model without a schema) yields [`FormView::Unavailable`].
pub fn build_form(key: Option<ModelKey>) -> FormView {
    match key {
        Some(key) => FormState::new(key).view(),
        None => FormView::Unavailable,
    }
}

/// Errors raised while editing a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("model '{model}' has no field named '{name}'")]
    UnknownField { model: ModelKey, name: String },
    #[error("expected name=value, got '{0}'")]
    BadAssignment(String),
    #[error("no model with an input form is selected")]
    NoForm,
}

/// Live values of a model's form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    key: ModelKey,
    values: Vec<(&'static FieldSpec, String)>,
}

impl FormState {
    /// A form pre-filled with the schema's example values.
    pub fn new(key: ModelKey) -> Self {
        let values = schema_for(key)
            .iter()
            .map(|spec| (spec, default_value(spec)))
            .collect();
        Self { key, values }
    }

    pub fn key(&self) -> ModelKey {
        self.key
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        self.values.iter().map(|(spec, value)| (*spec, value.as_str()))
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrite one field's current value.
    ///
    /// Select values are not checked against the option set; the backend
    /// owns validation.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let slot = self
            .values
            .iter_mut()
            .find(|(spec, _)| spec.name == name)
            .ok_or_else(|| FormError::UnknownField {
                model: self.key,
                name: name.to_string(),
            })?;
        slot.1 = value.into();
        Ok(())
    }

    /// Apply a `name=value` assignment.
    pub fn assign(&mut self, assignment: &str) -> Result<(), FormError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| FormError::BadAssignment(assignment.to_string()))?;
        self.set(name.trim(), value)
    }

    /// Serialize the current values for `POST /predictions/{key}`.
    ///
    /// Empty values are dropped. Number fields are parsed; a value that
    /// does not parse is sent as the raw string. Everything else is sent
    /// as a string.
    pub fn to_features(&self) -> Features {
        let mut features = Features::new();
        for (spec, raw) in &self.values {
            if raw.is_empty() {
                continue;
            }
            let value = match spec.kind {
                FieldKind::Number { .. } => {
                    parse_number(raw).unwrap_or_else(|| Value::String(raw.clone()))
                }
                _ => Value::String(raw.clone()),
            };
            features.insert(spec.name.to_string(), value);
        }
        features
    }

    /// Render the form with its current values.
    pub fn view(&self) -> FormView {
        let fields = self
            .values
            .iter()
            .map(|(spec, value)| FieldView {
                name: spec.name,
                label: spec.label,
                control: match spec.kind {
                    FieldKind::Select { options } => Control::Select {
                        options: options.to_vec(),
                        value: value.clone(),
                    },
                    FieldKind::Number { step, .. } => Control::Number {
                        value: value.clone(),
                        step: step.map(js_number).unwrap_or_else(|| "any".to_string()),
                        required: true,
                    },
                    FieldKind::Text { .. } => Control::Text {
                        value: value.clone(),
                        required: true,
                    },
                },
            })
            .collect();
        FormView::Fields(fields)
    }
}

fn default_value(spec: &FieldSpec) -> String {
    match spec.kind {
        FieldKind::Select { options } => options.first().copied().unwrap_or_default().to_string(),
        FieldKind::Number { value, .. } => js_number(value),
        FieldKind::Text { value } => value.to_string(),
    }
}

/// Render a number the way a browser writes it into an input value:
/// integral values lose their fractional part (`7.0` → `"7"`).
pub fn js_number(value: f64) -> String {
    format!("{value}")
}

/// Parse a number field. Integral values become JSON integers so the
/// request body matches what a browser would send.
fn parse_number(raw: &str) -> Option<Value> {
    let parsed: f64 = raw.trim().parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    if parsed.fract() == 0.0 && parsed.abs() < 9.0e15 {
        return Some(Value::from(parsed as i64));
    }
    serde_json::Number::from_f64(parsed).map(Value::Number)
}
