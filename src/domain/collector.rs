//! Tree collector: reads a live tree back into its declarative form.
//!
//! Pure readback. Selections that no longer exist in the catalog are returned
//! verbatim.

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::{LiveContent, LiveRule, LiveTree};
use crate::domain::catalog::ValueSource;
use crate::domain::entities::{Conditional, Node, Rule};
use crate::domain::error::{DomainError, DomainResult};

/// Collect the whole live tree from its root.
#[instrument(level = "debug", skip_all)]
pub fn collect(tree: &LiveTree) -> DomainResult<Node> {
    let root = tree.root().ok_or(DomainError::EmptyTree)?;
    collect_node(tree, root)
}

/// Collect the subtree rooted at `idx`.
pub fn collect_node(tree: &LiveTree, idx: Index) -> DomainResult<Node> {
    let node = tree.get_node(idx).ok_or(DomainError::NodeNotFound)?;
    match &node.content {
        LiveContent::Conditional(conditional) => {
            let children = node
                .children
                .iter()
                .map(|&child| collect_node(tree, child))
                .collect::<DomainResult<Vec<_>>>()?;
            Ok(Node::Conditional(Conditional::new(conditional.kind()?, children)))
        }
        LiveContent::Rule(rule) => collect_rule(rule).map(Node::Rule),
    }
}

/// Declarative rule of a live rule.
pub fn collect_rule(rule: &LiveRule) -> DomainResult<Rule> {
    let last = rule.values.last().ok_or_else(|| DomainError::MissingValue {
        field: rule.field_name().to_string(),
    })?;
    let is_field_comparison = rule.values.len() > 1
        && rule.values[0]
            .selection()
            .map(ValueSource::classify)
            == Some(ValueSource::Field);

    Ok(Rule {
        name: rule.field_name().to_string(),
        operator: rule.operator_name().to_string(),
        value: last.value(),
        is_field_comparison,
    })
}
