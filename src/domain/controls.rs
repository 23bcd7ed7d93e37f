//! Selectable options and value-entry controls of the live tree.

use serde_json::Value;
use tracing::debug;

use crate::domain::catalog::{FieldType, OptionDef};

/// One entry of a choice control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
    /// Declared entry type of a nested option (select values only)
    pub field_type: Option<FieldType>,
    /// Nested options offered once this option is chosen
    pub options: Vec<OptionDef>,
}

impl SelectOption {
    pub fn with_field_type(mut self, field_type: Option<FieldType>) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn with_options(mut self, options: Vec<OptionDef>) -> Self {
        self.options = options;
        self
    }
}

/// Build a selectable option.
pub fn make_option(value: impl Into<String>, text: impl Into<String>, selected: bool) -> SelectOption {
    SelectOption {
        value: value.into(),
        text: text.into(),
        selected,
        field_type: None,
        options: Vec::new(),
    }
}

/// Option carrying the nested metadata of a catalog option.
pub fn option_from_def(def: &OptionDef, selected: bool) -> SelectOption {
    make_option(def.name.as_str(), def.display_label(), selected)
        .with_field_type(def.field_type)
        .with_options(def.options.clone())
}

/// Single-select group.
///
/// Exactly one option is selected whenever the group is non-empty. A value
/// selected that no option carries is kept verbatim as a stale selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Choice {
    options: Vec<SelectOption>,
    stale: Option<String>,
}

impl Choice {
    pub fn new(mut options: Vec<SelectOption>) -> Self {
        let first_selected = options.iter().position(|o| o.selected).unwrap_or(0);
        for (i, option) in options.iter_mut().enumerate() {
            option.selected = i == first_selected;
        }
        Self {
            options,
            stale: None,
        }
    }

    /// Choice over catalog options, nothing preselected.
    pub fn from_defs(defs: &[OptionDef]) -> Self {
        Self::new(defs.iter().map(|d| option_from_def(d, false)).collect())
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.stale.is_none()
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        if self.stale.is_some() {
            return None;
        }
        self.options.iter().find(|o| o.selected)
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.stale {
            Some(stale) => Some(stale.as_str()),
            None => self.selected_option().map(|o| o.value.as_str()),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Select `value`; returns whether an option carries it.
    pub fn select(&mut self, value: &str) -> bool {
        let known = self.contains(value);
        for option in self.options.iter_mut() {
            option.selected = option.value == value;
        }
        if known {
            self.stale = None;
        } else {
            debug!(value, "selection not among options, keeping it verbatim");
            self.stale = Some(value.to_string());
        }
        known
    }

    /// Replace all options, keeping the first one selected.
    pub fn replace_options(&mut self, options: Vec<SelectOption>) {
        *self = Self::new(options);
    }
}

/// Value-entry control of a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueControl {
    Hidden(Value),
    Text(Value),
    TextArea(Value),
    Choice(Choice),
}

impl ValueControl {
    /// Empty control for a non-select entry type.
    pub fn blank(field_type: FieldType) -> Option<Self> {
        match field_type {
            FieldType::None => Some(ValueControl::Hidden(Value::Null)),
            FieldType::Text => Some(ValueControl::Text(Value::Null)),
            FieldType::Textarea => Some(ValueControl::TextArea(Value::Null)),
            FieldType::Select | FieldType::Rule => None,
        }
    }

    pub fn value(&self) -> Value {
        match self {
            ValueControl::Hidden(v) | ValueControl::Text(v) | ValueControl::TextArea(v) => v.clone(),
            ValueControl::Choice(choice) => choice
                .selected()
                .map(|s| Value::String(s.to_string()))
                .unwrap_or(Value::Null),
        }
    }

    /// Current selection of a choice control.
    pub fn selection(&self) -> Option<&str> {
        match self {
            ValueControl::Choice(choice) => choice.selected(),
            _ => None,
        }
    }

    /// Store `value`; choice controls select its string form, null is ignored.
    pub fn set_value(&mut self, value: Value) {
        match self {
            ValueControl::Hidden(v) | ValueControl::Text(v) | ValueControl::TextArea(v) => *v = value,
            ValueControl::Choice(choice) => match value {
                Value::Null => {}
                Value::String(s) => {
                    choice.select(&s);
                }
                other => {
                    choice.select(&other.to_string());
                }
            },
        }
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            ValueControl::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn as_choice_mut(&mut self) -> Option<&mut Choice> {
        match self {
            ValueControl::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueControl::Hidden(_) => "hidden",
            ValueControl::Text(_) => "text",
            ValueControl::TextArea(_) => "textarea",
            ValueControl::Choice(_) => "select",
        }
    }
}
