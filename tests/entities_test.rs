//! Tests for the declarative tree wire form

use serde_json::json;

use condtree::domain::{CombinatorKind, DomainError, Node, Rule};

#[test]
fn given_nested_json_when_parsing_then_builds_typed_tree() {
    // Arrange
    let raw = json!({
        "any": [
            {"name": "age", "operator": "gt", "value": 30, "isFieldComparison": false},
            {"none": [
                {"name": "color", "operator": "is", "value": "red", "isFieldComparison": false}
            ]}
        ]
    });

    // Act
    let node = Node::from_json(&raw).unwrap();

    // Assert
    let root = node.as_conditional().expect("conditional root");
    assert_eq!(root.kind, CombinatorKind::Any);
    assert_eq!(root.children.len(), 2);
    assert_eq!(
        root.children[0],
        Node::Rule(Rule::new("age", "gt", json!(30)))
    );
    let nested = root.children[1].as_conditional().unwrap();
    assert_eq!(nested.kind, CombinatorKind::None);
    assert_eq!(nested.children[0].as_rule().unwrap().value, json!("red"));
}

#[test]
fn given_typed_tree_when_serializing_then_matches_wire_form() {
    // Arrange
    let node = Node::all(vec![
        Rule::new("age", "gt", json!(30)).into(),
        Rule::comparing_field("height", "equals", "weight").into(),
        Node::any(vec![]),
    ]);

    // Act
    let value = serde_json::to_value(&node).unwrap();

    // Assert
    assert_eq!(
        value,
        json!({
            "all": [
                {"name": "age", "operator": "gt", "value": 30, "isFieldComparison": false},
                {"name": "height", "operator": "equals", "value": "weight", "isFieldComparison": true},
                {"any": []}
            ]
        })
    );
}

#[test]
fn given_rule_without_optional_keys_when_parsing_then_uses_defaults() {
    let node = Node::from_json(&json!({"name": "age", "operator": "gt"})).unwrap();

    let rule = node.as_rule().unwrap();
    assert_eq!(rule.value, serde_json::Value::Null);
    assert!(!rule.is_field_comparison);
}

#[test]
fn given_several_kind_keys_when_parsing_then_all_takes_precedence() {
    let node = Node::from_json(&json!({"none": [], "all": []})).unwrap();

    assert_eq!(node.as_conditional().unwrap().kind, CombinatorKind::All);
}

#[test]
fn given_unknown_shape_when_parsing_then_names_offending_node() {
    // Act
    let err = Node::from_json(&json!({"foo": 1})).unwrap_err();

    // Assert
    match err {
        DomainError::MalformedNode { node } => assert!(node.contains("foo")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_malformed_nested_child_when_parsing_then_reports_the_child() {
    let raw = json!({"all": [{"name": "age", "operator": "gt"}, {"operator": "lt"}]});

    let err = Node::from_json(&raw).unwrap_err();

    assert_eq!(
        err,
        DomainError::MalformedNode {
            node: json!({"operator": "lt"}).to_string()
        }
    );
}

#[test]
fn given_kind_key_without_array_when_parsing_then_errors() {
    assert!(Node::from_json(&json!({"all": 3})).is_err());
    assert!(Node::from_json(&json!([1, 2])).is_err());
}

#[test]
fn given_json_text_when_deserializing_with_serde_then_parses() {
    let node: Node = serde_json::from_str(r#"{"any": [{"name": "a", "operator": "b", "value": null}]}"#).unwrap();
    assert_eq!(node.as_conditional().unwrap().children.len(), 1);

    let err = serde_json::from_str::<Node>(r#"{"neither": true}"#).unwrap_err();
    assert!(err.to_string().contains("malformed condition node"));
}

#[test]
fn given_default_node_then_is_empty_all() {
    assert_eq!(Node::default().to_json(), json!({"all": []}));
}
