//! Tree builder: turns a declarative condition tree into a live tree.

use generational_arena::Index;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{LiveConditional, LiveContent, LiveRule, LiveTree};
use crate::domain::catalog::{FieldCatalog, ValueSource};
use crate::domain::controls::{make_option, Choice, ValueControl};
use crate::domain::dispatch::{has_source_selector, InputDispatcher};
use crate::domain::entities::{Node, Rule};
use crate::domain::error::{DomainError, DomainResult};

/// Constructs live trees from declarative trees against a field catalog.
pub struct TreeBuilder<'a> {
    catalog: &'a FieldCatalog,
    dispatcher: InputDispatcher<'a>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self {
            catalog,
            dispatcher: InputDispatcher::new(catalog),
        }
    }

    pub fn dispatcher(&self) -> &InputDispatcher<'a> {
        &self.dispatcher
    }

    /// Build a fresh live tree rooted at `node`.
    #[instrument(level = "debug", skip_all)]
    pub fn build(&self, node: &Node) -> DomainResult<LiveTree> {
        let mut tree = LiveTree::new();
        self.build_into(&mut tree, node, None)?;
        debug!(
            nodes = tree.len(),
            rules = tree.rule_nodes().len(),
            depth = tree.depth(),
            "live tree built"
        );
        Ok(tree)
    }

    /// Build `node` and append it under `parent` (or as root).
    ///
    /// On failure nothing built by this call stays attached to `parent`.
    pub fn build_into(&self, tree: &mut LiveTree, node: &Node, parent: Option<Index>) -> DomainResult<Index> {
        let mut top = None;
        let result = self.build_subtree(tree, node, parent, &mut top);
        if result.is_err() && parent.is_some() {
            if let Some(idx) = top {
                tree.detach(idx)?;
            }
        }
        result
    }

    fn build_subtree<'n>(
        &self,
        tree: &mut LiveTree,
        node: &'n Node,
        parent: Option<Index>,
        top: &mut Option<Index>,
    ) -> DomainResult<Index> {
        let mut stack: Vec<(&'n Node, Option<Index>)> = vec![(node, parent)];

        while let Some((current, parent_idx)) = stack.pop() {
            let content = match current {
                Node::Conditional(c) => LiveContent::Conditional(LiveConditional::new(c.kind)),
                Node::Rule(r) => LiveContent::Rule(self.build_rule(r)?),
            };
            let current_idx = tree.insert_node(content, parent_idx)?;
            top.get_or_insert(current_idx);

            // Reverse push keeps document order when popping
            if let Node::Conditional(c) = current {
                for child in c.children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        top.ok_or(DomainError::EmptyTree)
    }

    /// Live rule for `rule`: field selector, operators, value controls, seeded value.
    #[instrument(level = "trace", skip(self), fields(field = %rule.name, operator = %rule.operator))]
    pub fn build_rule(&self, rule: &Rule) -> DomainResult<LiveRule> {
        if self.catalog.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }
        let mut live = LiveRule {
            field: self.field_selector(&rule.name),
            operator: Choice::default(),
            values: Vec::new(),
        };
        let preferred = (live.field_name() == rule.name).then_some(rule.operator.as_str());
        self.wire_field(&mut live, preferred)?;
        self.seed(&mut live, rule)?;
        Ok(live)
    }

    /// Field selector over the catalog with `selected` preselected.
    pub fn field_selector(&self, selected: &str) -> Choice {
        if self.catalog.field(selected).is_none() {
            warn!(field = selected, "field not in catalog, selecting first field");
        }
        Choice::new(
            self.catalog
                .fields()
                .iter()
                .map(|f| make_option(f.name.as_str(), f.display_label(), f.name == selected))
                .collect(),
        )
    }

    /// Repopulate operators for the selected field, then regenerate value controls.
    ///
    /// `rule` is left as it was when the new controls cannot be built.
    pub fn wire_field(&self, rule: &mut LiveRule, preferred_operator: Option<&str>) -> DomainResult<()> {
        let operators = self.catalog.operators_for(rule.field_name()).unwrap_or(&[]);
        let mut operator = rule.operator.clone();
        operator.replace_options(
            operators
                .iter()
                .map(|op| {
                    make_option(
                        op.name.as_str(),
                        op.display_label(),
                        preferred_operator == Some(op.name.as_str()),
                    )
                })
                .collect(),
        );
        let values = self.value_controls(rule.field_name(), operator.selected().unwrap_or_default())?;
        rule.operator = operator;
        rule.values = values;
        Ok(())
    }

    /// Regenerate value controls for the selected operator.
    pub fn wire_operator(&self, rule: &mut LiveRule) -> DomainResult<()> {
        rule.values = self.value_controls(rule.field_name(), rule.operator_name())?;
        Ok(())
    }

    /// Select `field` and rewire its operators and values, all or nothing.
    pub fn select_field(&self, rule: &mut LiveRule, field: &str) -> DomainResult<()> {
        let mut candidate = rule.clone();
        candidate.field.select(field);
        self.wire_field(&mut candidate, None)?;
        *rule = candidate;
        Ok(())
    }

    /// Select `operator` and regenerate its value controls, all or nothing.
    pub fn select_operator(&self, rule: &mut LiveRule, operator: &str) -> DomainResult<()> {
        let values = self.value_controls(rule.field_name(), operator)?;
        rule.operator.select(operator);
        rule.values = values;
        Ok(())
    }

    fn value_controls(&self, field_name: &str, operator_name: &str) -> DomainResult<Vec<ValueControl>> {
        let field = self.catalog.field(field_name);
        match (field, field.and_then(|f| f.operator(operator_name))) {
            (Some(field), Some(operator)) => self.dispatcher.controls_for(field, operator),
            _ => {
                warn!(
                    field = field_name,
                    operator = operator_name,
                    "no operator metadata, rule has no value controls"
                );
                Ok(Vec::new())
            }
        }
    }

    fn seed(&self, live: &mut LiveRule, rule: &Rule) -> DomainResult<()> {
        if has_source_selector(live) {
            let source = if rule.is_field_comparison {
                ValueSource::Field
            } else {
                ValueSource::Static
            };
            let available = source
                .token()
                .filter(|token| live.values[0].as_choice().is_some_and(|c| c.contains(token)));
            match available {
                Some(token) => self.dispatcher.redispatch_source(live, token)?,
                None => warn!(field = %rule.name, ?source, "value source not offered by field"),
            }
        } else if rule.is_field_comparison {
            warn!(field = %rule.name, "field comparison without a value source selector");
        }

        if !rule.value.is_null() {
            if let Some(last) = live.values.last_mut() {
                last.set_value(rule.value.clone());
            }
        }
        Ok(())
    }

    /// Rule appended by "Add Condition": first field, its first operator, no value.
    pub fn default_rule(&self) -> DomainResult<Rule> {
        let field = self.catalog.first().ok_or(DomainError::EmptyCatalog)?;
        let operator = field
            .operators
            .first()
            .map(|op| op.name.clone())
            .unwrap_or_default();
        Ok(Rule::new(field.name.clone(), operator, Value::Null))
    }

    /// Conditional appended by "Add Sub-Condition": `all` wrapping one default rule.
    pub fn default_sub_condition(&self) -> DomainResult<Node> {
        Ok(Node::all(vec![self.default_rule()?.into()]))
    }
}
