//! Field catalog: the caller-supplied description of selectable fields.
//!
//! The catalog is read-only configuration. Every field lists the operators it
//! supports, and each operator declares which kind of value entry it needs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of value entry an operator (or a nested option) asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// No visible entry; a hidden value holder.
    None,
    /// Single-line text entry.
    #[default]
    Text,
    /// Multi-line text entry.
    Textarea,
    /// Choice over the field's declared options.
    Select,
    /// Reserved: a value governed by a nested rule.
    Rule,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::None => "none",
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Rule => "rule",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the value of a select-typed rule comes from.
///
/// Derived from the name of the chosen select option: `static` means a literal
/// entered by the user, `field` means another field is referenced. Any other
/// option is itself the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    Static,
    Field,
    Plain,
}

impl ValueSource {
    pub const STATIC: &'static str = "static";
    pub const FIELD: &'static str = "field";

    pub fn classify(option_name: &str) -> Self {
        match option_name {
            Self::STATIC => ValueSource::Static,
            Self::FIELD => ValueSource::Field,
            _ => ValueSource::Plain,
        }
    }

    /// Option name selecting this source, `None` for plain options.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            ValueSource::Static => Some(Self::STATIC),
            ValueSource::Field => Some(Self::FIELD),
            ValueSource::Plain => None,
        }
    }
}

/// Operator offered for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "fieldType", default)]
    pub field_type: FieldType,
}

impl OperatorDef {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: Some(label.into()),
            field_type,
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Nested option of a select-typed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "fieldType", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDef>,
}

impl OptionDef {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: Some(label.into()),
            field_type: None,
            options: Vec::new(),
        }
    }

    pub fn with_field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_options(mut self, options: Vec<OptionDef>) -> Self {
        self.options = options;
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A selectable field with its operators and select options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub operators: Vec<OperatorDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDef>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            operators: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn with_operator(mut self, operator: OperatorDef) -> Self {
        self.operators.push(operator);
        self
    }

    pub fn with_options(mut self, options: Vec<OptionDef>) -> Self {
        self.options = options;
        self
    }

    pub fn operator(&self, name: &str) -> Option<&OperatorDef> {
        self.operators.iter().find(|op| op.name == name)
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Ordered, read-only collection of field definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: Vec<FieldDef>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn first(&self) -> Option<&FieldDef> {
        self.fields.first()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn operators_for(&self, name: &str) -> Option<&[OperatorDef]> {
        self.field(name).map(|f| f.operators.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl From<Vec<FieldDef>> for FieldCatalog {
    fn from(fields: Vec<FieldDef>) -> Self {
        Self::new(fields)
    }
}
