//! # Label Schema Model
//!
//! Typed description of the label form for an assignment: an ordered list of
//! input field descriptors plus an optional rendering-component name. Schemas
//! are versioned upstream in Anvil; this layer treats each one as immutable
//! for the life of its assignment.

use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSchema {
    pub name: String,
    pub fields: Vec<Field>,
    /// Name of the rendering component registered for this schema, if any.
    /// Resolution and fallback live in the component registry.
    pub component: Option<String>,
}

impl LabelSchema {
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|e| PayloadError::new("LabelSchema", e.to_string()))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Generic schema checks over submitted values: required presence, scale
    /// bounds, option membership, boolean typing. Returns one message per
    /// failing field; empty map means the values pass.
    pub fn validate_values(
        &self,
        values: &BTreeMap<String, serde_json::Value>,
    ) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        for field in &self.fields {
            let value = values.get(&field.name);
            let Some(value) = value else {
                if field.required {
                    errors.insert(field.name.clone(), "required field is missing".to_string());
                }
                continue;
            };

            match field.kind() {
                FieldKind::Scale => {
                    let Some(number) = value.as_f64() else {
                        errors.insert(field.name.clone(), "expected a number".to_string());
                        continue;
                    };
                    if let Some(min) = field.min {
                        if number < min {
                            errors.insert(field.name.clone(), format!("below minimum {min}"));
                        }
                    }
                    if let Some(max) = field.max {
                        if number > max {
                            errors.insert(field.name.clone(), format!("above maximum {max}"));
                        }
                    }
                }
                FieldKind::Boolean => {
                    if !value.is_boolean() {
                        errors.insert(field.name.clone(), "expected true or false".to_string());
                    }
                }
                FieldKind::Select => {
                    if let (Some(options), Some(chosen)) = (&field.options, value.as_str()) {
                        if !options.iter().any(|o| o == chosen) {
                            errors.insert(field.name.clone(), "not one of the options".to_string());
                        }
                    }
                }
                FieldKind::Text | FieldKind::Other => {}
            }
        }

        errors
    }
}

/// One input field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Type tag as reported by Anvil, stored verbatim for exact round-trips.
    /// Interpret through [`Field::kind`]; unrecognized tags render as a plain
    /// text input.
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub default: Option<serde_json::Value>,
    pub options: Option<Vec<String>>,
    pub help_text: Option<String>,
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        FieldKind::parse(&self.field_type)
    }
}

/// Known field kinds for generic form rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scale,
    Text,
    Boolean,
    Select,
    Other,
}

impl FieldKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "scale" => FieldKind::Scale,
            "text" => FieldKind::Text,
            "boolean" => FieldKind::Boolean,
            "select" => FieldKind::Select,
            _ => FieldKind::Other,
        }
    }
}
