//! Domain entities: the declarative condition tree
//!
//! Wire form (JSON):
//! - conditional: `{"all": [...]}`, `{"any": [...]}` or `{"none": [...]}`
//! - rule: `{"name": .., "operator": .., "value": .., "isFieldComparison": ..}`

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// Boolean combinator of a conditional node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinatorKind {
    #[default]
    All,
    Any,
    None,
}

impl CombinatorKind {
    /// Parse precedence when several kind keys are present.
    pub const ALL_KINDS: [CombinatorKind; 3] =
        [CombinatorKind::All, CombinatorKind::Any, CombinatorKind::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            CombinatorKind::All => "all",
            CombinatorKind::Any => "any",
            CombinatorKind::None => "none",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CombinatorKind::All => "All",
            CombinatorKind::Any => "Any",
            CombinatorKind::None => "None",
        }
    }
}

impl fmt::Display for CombinatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombinatorKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_KINDS
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DomainError::MalformedNode {
                node: format!("unknown combinator kind '{}'", s),
            })
    }
}

/// A combinator holding an ordered list of child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub kind: CombinatorKind,
    pub children: Vec<Node>,
}

impl Conditional {
    pub fn new(kind: CombinatorKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn empty(kind: CombinatorKind) -> Self {
        Self::new(kind, Vec::new())
    }
}

impl Serialize for Conditional {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.as_str(), &self.children)?;
        map.end()
    }
}

/// Leaf comparing a field to a value (or to another field).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub name: String,
    pub operator: String,
    pub value: Value,
    #[serde(rename = "isFieldComparison")]
    pub is_field_comparison: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            operator: operator.into(),
            value,
            is_field_comparison: false,
        }
    }

    /// Rule comparing `name` against the field `other`.
    pub fn comparing_field(
        name: impl Into<String>,
        operator: impl Into<String>,
        other: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operator: operator.into(),
            value: Value::String(other.into()),
            is_field_comparison: true,
        }
    }
}

/// A node of the declarative tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Conditional(Conditional),
    Rule(Rule),
}

impl Node {
    pub fn conditional(kind: CombinatorKind, children: Vec<Node>) -> Self {
        Node::Conditional(Conditional::new(kind, children))
    }

    pub fn all(children: Vec<Node>) -> Self {
        Self::conditional(CombinatorKind::All, children)
    }

    pub fn any(children: Vec<Node>) -> Self {
        Self::conditional(CombinatorKind::Any, children)
    }

    pub fn none(children: Vec<Node>) -> Self {
        Self::conditional(CombinatorKind::None, children)
    }

    pub fn as_conditional(&self) -> Option<&Conditional> {
        match self {
            Node::Conditional(c) => Some(c),
            Node::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(r) => Some(r),
            Node::Conditional(_) => None,
        }
    }

    /// Parse a node from its JSON wire form.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let malformed = || DomainError::MalformedNode {
            node: value.to_string(),
        };
        let obj = value.as_object().ok_or_else(malformed)?;

        for kind in CombinatorKind::ALL_KINDS {
            if let Some(children) = obj.get(kind.as_str()) {
                let children = children.as_array().ok_or_else(malformed)?;
                let children = children
                    .iter()
                    .map(Node::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Node::conditional(kind, children));
            }
        }

        rule_from_object(obj).map(Node::Rule).ok_or_else(malformed)
    }

    pub fn to_json(&self) -> Value {
        // Serializing these types into a Value cannot fail: keys are strings.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn rule_from_object(obj: &Map<String, Value>) -> Option<Rule> {
    let name = obj.get("name")?.as_str()?;
    let operator = obj.get("operator")?.as_str()?;
    let value = obj.get("value").cloned().unwrap_or(Value::Null);
    let is_field_comparison = obj
        .get("isFieldComparison")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(Rule {
        name: name.to_string(),
        operator: operator.to_string(),
        value,
        is_field_comparison,
    })
}

impl Default for Node {
    fn default() -> Self {
        Node::Conditional(Conditional::empty(CombinatorKind::All))
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl From<Conditional> for Node {
    fn from(conditional: Conditional) -> Self {
        Node::Conditional(conditional)
    }
}

impl TryFrom<Value> for Node {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Node::from_json(&value)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Conditional(c) => c.serialize(serializer),
            Node::Rule(r) => r.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Node::from_json(&raw).map_err(serde::de::Error::custom)
    }
}
