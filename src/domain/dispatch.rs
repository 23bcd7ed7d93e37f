//! Input-type dispatch: which value controls an operator needs.
//!
//! First level maps the operator's `FieldType` to controls. A `select`
//! operator yields a choice over the field's options; the chosen option then
//! drives a second level (`static` literal entry or `field` reference).

use tracing::{debug, instrument};

use crate::domain::arena::LiveRule;
use crate::domain::catalog::{FieldCatalog, FieldDef, FieldType, OperatorDef, ValueSource};
use crate::domain::controls::{make_option, Choice, SelectOption, ValueControl};
use crate::domain::error::{DomainError, DomainResult};

/// Produces value controls from catalog metadata.
pub struct InputDispatcher<'a> {
    catalog: &'a FieldCatalog,
}

impl<'a> InputDispatcher<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self { catalog }
    }

    /// Value controls for `operator` of `field`.
    #[instrument(level = "debug", skip(self, field, operator), fields(field = %field.name, operator = %operator.name))]
    pub fn controls_for(&self, field: &FieldDef, operator: &OperatorDef) -> DomainResult<Vec<ValueControl>> {
        match operator.field_type {
            FieldType::Select => {
                let source = Choice::from_defs(&field.options);
                let mut controls = Vec::with_capacity(2);
                let nested = match source.selected_option() {
                    Some(option) => self.source_controls(field, option)?,
                    None => None,
                };
                controls.push(ValueControl::Choice(source));
                controls.extend(nested);
                let kinds: Vec<&str> = controls.iter().map(ValueControl::kind_name).collect();
                debug!(?kinds, "select controls");
                Ok(controls)
            }
            FieldType::Rule => Err(DomainError::UnsupportedFieldType {
                field: field.name.clone(),
                choice: operator.name.clone(),
                field_type: FieldType::Rule,
            }),
            other => Ok(ValueControl::blank(other).into_iter().collect()),
        }
    }

    /// Second-level control for the chosen option of a select operator.
    pub fn source_controls(&self, field: &FieldDef, option: &SelectOption) -> DomainResult<Option<ValueControl>> {
        match ValueSource::classify(&option.value) {
            ValueSource::Static => {
                let field_type = option.field_type.unwrap_or_default();
                match field_type {
                    FieldType::Select => Ok(Some(ValueControl::Choice(Choice::from_defs(&option.options)))),
                    FieldType::Rule => Err(DomainError::UnsupportedFieldType {
                        field: field.name.clone(),
                        choice: option.value.clone(),
                        field_type,
                    }),
                    other => Ok(ValueControl::blank(other)),
                }
            }
            ValueSource::Field => {
                let choice = if option.options.is_empty() {
                    self.other_fields(field)
                } else {
                    Choice::from_defs(&option.options)
                };
                Ok(Some(ValueControl::Choice(choice)))
            }
            ValueSource::Plain => Ok(None),
        }
    }

    /// Switch the value source of a select rule and regenerate the control below it.
    ///
    /// Everything after the source selector is discarded. On error `rule` keeps
    /// its previous selection and controls.
    pub fn redispatch_source(&self, rule: &mut LiveRule, selection: &str) -> DomainResult<()> {
        let field_name = rule.field_name();
        let mut source = rule
            .values
            .first()
            .and_then(ValueControl::as_choice)
            .cloned()
            .ok_or_else(|| DomainError::NoValueSource {
                field: field_name.to_string(),
            })?;
        source.select(selection);

        let below = match source.selected_option() {
            Some(option) => {
                let field = self
                    .catalog
                    .field(field_name)
                    .ok_or_else(|| DomainError::UnknownField(field_name.to_string()))?;
                self.source_controls(field, option)?
            }
            None => {
                debug!(selection, "no option for value source, nothing to render below it");
                None
            }
        };
        rule.values = std::iter::once(ValueControl::Choice(source)).chain(below).collect();
        Ok(())
    }

    fn other_fields(&self, field: &FieldDef) -> Choice {
        Choice::new(
            self.catalog
                .fields()
                .iter()
                .filter(|f| f.name != field.name)
                .map(|f| make_option(f.name.as_str(), f.display_label(), false))
                .collect(),
        )
    }
}

/// Whether the rule's controls start with a static/field source selector.
pub fn has_source_selector(rule: &LiveRule) -> bool {
    rule.values.len() > 1
        || rule
            .values
            .first()
            .and_then(ValueControl::as_choice)
            .map(|c| {
                c.options()
                    .iter()
                    .any(|o| ValueSource::classify(&o.value) != ValueSource::Plain)
            })
            .unwrap_or(false)
}
