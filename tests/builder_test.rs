//! Tests for TreeBuilder and the input-type dispatcher

use rstest::{fixture, rstest};
use serde_json::{json, Value};

use condtree::domain::{
    CombinatorKind, DomainError, FieldCatalog, FieldDef, FieldType, InputDispatcher, LiveTree, Node, OperatorDef,
    OptionDef, Rule, TreeBuilder, ValueControl,
};
use condtree::util::testing;

#[fixture]
fn catalog() -> FieldCatalog {
    testing::init_test_setup();
    testing::sample_catalog()
}

fn only_rule(tree: &LiveTree) -> &condtree::domain::LiveRule {
    let rules = tree.rule_nodes();
    assert_eq!(rules.len(), 1);
    tree.rule(rules[0]).unwrap()
}

#[rstest]
fn given_single_text_rule_when_building_then_creates_selectors_and_text_entry(catalog: FieldCatalog) {
    // Arrange
    let data = Node::all(vec![Rule::new("age", "gt", json!(30)).into()]);

    // Act
    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    // Assert
    let root = tree.root().unwrap();
    assert_eq!(tree.conditional(root).unwrap().kind().unwrap(), CombinatorKind::All);
    let rule = only_rule(&tree);
    assert_eq!(rule.field_name(), "age");
    assert_eq!(rule.operator_name(), "gt");
    assert_eq!(rule.field.options().len(), 4);
    assert_eq!(rule.operator.options().len(), 2);
    assert_eq!(rule.values, vec![ValueControl::Text(json!(30))]);
}

#[rstest]
fn given_nested_tree_when_building_then_keeps_document_order(catalog: FieldCatalog) {
    // Arrange
    let data = Node::any(vec![
        Rule::new("age", "gt", json!(1)).into(),
        Node::none(vec![Rule::new("age", "lt", json!(2)).into()]),
        Rule::new("age", "gt", json!(3)).into(),
    ]);

    // Act
    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    // Assert
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.depth(), 3);
    let values: Vec<Value> = tree
        .rule_nodes()
        .into_iter()
        .map(|idx| tree.rule(idx).unwrap().values[0].value())
        .collect();
    assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
}

#[rstest]
fn given_select_rule_with_static_value_when_building_then_adds_source_selector(catalog: FieldCatalog) {
    let data = Node::all(vec![Rule::new("height", "equals", json!("170")).into()]);

    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    let rule = only_rule(&tree);
    assert_eq!(rule.values.len(), 2);
    assert_eq!(rule.values[0].selection(), Some("static"));
    assert_eq!(rule.values[1], ValueControl::Text(json!("170")));
}

#[rstest]
fn given_field_comparison_when_building_then_selects_referenced_field(catalog: FieldCatalog) {
    let data = Node::all(vec![Rule::comparing_field("height", "equals", "weight").into()]);

    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    let rule = only_rule(&tree);
    assert_eq!(rule.values[0].selection(), Some("field"));
    let reference = rule.values[1].as_choice().unwrap();
    assert_eq!(reference.selected(), Some("weight"));
    assert_eq!(reference.options().len(), 2);
}

#[rstest]
fn given_select_rule_with_plain_options_when_building_then_selects_value(catalog: FieldCatalog) {
    let data = Node::all(vec![Rule::new("color", "is", json!("blue")).into()]);

    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    let rule = only_rule(&tree);
    assert_eq!(rule.values.len(), 1);
    assert_eq!(rule.values[0].selection(), Some("blue"));
}

#[rstest]
#[case("contains", json!("needle"), ValueControl::TextArea(json!("needle")))]
#[case("present", Value::Null, ValueControl::Hidden(Value::Null))]
fn given_non_select_operator_when_building_then_matches_field_type(
    catalog: FieldCatalog,
    #[case] operator: &str,
    #[case] value: Value,
    #[case] expected: ValueControl,
) {
    let data = Node::all(vec![Rule::new("notes", operator, value).into()]);

    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    assert_eq!(only_rule(&tree).values, vec![expected]);
}

#[rstest]
fn given_unknown_field_when_building_then_falls_back_to_first_field(catalog: FieldCatalog) {
    let data = Node::all(vec![Rule::new("shoe_size", "gt", json!(44)).into()]);

    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    let rule = only_rule(&tree);
    assert_eq!(rule.field_name(), "age");
    assert_eq!(rule.operator_name(), "gt");
}

#[rstest]
fn given_unknown_operator_when_building_then_preselects_first_operator(catalog: FieldCatalog) {
    let data = Node::all(vec![Rule::new("age", "between", json!(5)).into()]);

    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    let rule = only_rule(&tree);
    assert_eq!(rule.operator_name(), "gt");
    assert_eq!(rule.values, vec![ValueControl::Text(json!(5))]);
}

#[rstest]
fn given_non_first_operator_when_building_then_preselects_it(catalog: FieldCatalog) {
    let data = Node::all(vec![Rule::new("age", "lt", json!(5)).into()]);

    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    assert_eq!(only_rule(&tree).operator_name(), "lt");
}

#[test]
fn given_operator_of_type_rule_when_building_then_fails() {
    // Arrange
    let catalog = FieldCatalog::new(vec![
        FieldDef::new("nested", "Nested").with_operator(OperatorDef::new("matches", "matches", FieldType::Rule))
    ]);
    let data = Node::all(vec![Rule::new("nested", "matches", Value::Null).into()]);

    // Act
    let err = TreeBuilder::new(&catalog).build(&data).unwrap_err();

    // Assert
    assert_eq!(
        err,
        DomainError::UnsupportedFieldType {
            field: "nested".into(),
            choice: "matches".into(),
            field_type: FieldType::Rule,
        }
    );
}

#[test]
fn given_empty_catalog_when_building_rule_then_fails() {
    let catalog = FieldCatalog::default();

    let empty = TreeBuilder::new(&catalog).build(&Node::all(vec![])).unwrap();
    let err = TreeBuilder::new(&catalog)
        .build(&Node::all(vec![Rule::new("age", "gt", json!(1)).into()]))
        .unwrap_err();

    assert_eq!(empty.len(), 1);
    assert_eq!(err, DomainError::EmptyCatalog);
}

#[rstest]
fn given_failing_child_when_building_into_parent_then_parent_is_unchanged(catalog: FieldCatalog) {
    // Arrange
    let builder = TreeBuilder::new(&catalog);
    let mut tree = builder.build(&Node::all(vec![])).unwrap();
    let root = tree.root().unwrap();
    let empty = FieldCatalog::default();
    let failing = TreeBuilder::new(&empty);

    // Act
    let result = failing.build_into(&mut tree, &Node::any(vec![Rule::new("age", "gt", json!(1)).into()]), Some(root));

    // Assert
    assert!(result.is_err());
    assert_eq!(tree.len(), 1);
    assert!(tree.get_node(root).unwrap().children.is_empty());
}

#[rstest]
fn given_catalog_when_asking_defaults_then_uses_first_field_and_operator(catalog: FieldCatalog) {
    let builder = TreeBuilder::new(&catalog);

    assert_eq!(builder.default_rule().unwrap(), Rule::new("age", "gt", Value::Null));
    assert_eq!(
        builder.default_sub_condition().unwrap(),
        Node::all(vec![Rule::new("age", "gt", Value::Null).into()])
    );
}

#[test]
fn given_field_option_without_own_options_when_dispatching_then_lists_other_fields() {
    // Arrange
    let catalog = FieldCatalog::new(vec![
        FieldDef::new("width", "Width")
            .with_operator(OperatorDef::new("equals", "=", FieldType::Select))
            .with_options(vec![OptionDef::new("field", "Field"), OptionDef::new("static", "Value")]),
        FieldDef::new("depth", "Depth"),
        FieldDef::new("length", "Length"),
    ]);
    let field = catalog.field("width").unwrap();
    let operator = field.operator("equals").unwrap();

    // Act
    let controls = InputDispatcher::new(&catalog).controls_for(field, operator).unwrap();

    // Assert
    assert_eq!(controls.len(), 2);
    assert_eq!(controls[0].selection(), Some("field"));
    let names: Vec<&str> = controls[1]
        .as_choice()
        .unwrap()
        .options()
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(names, vec!["depth", "length"]);
}

#[rstest]
fn given_static_option_of_select_type_when_dispatching_then_offers_nested_choice() {
    let catalog = FieldCatalog::new(vec![FieldDef::new("size", "Size")
        .with_operator(OperatorDef::new("is", "is", FieldType::Select))
        .with_options(vec![OptionDef::new("static", "Value")
            .with_field_type(FieldType::Select)
            .with_options(vec![OptionDef::new("s", "Small"), OptionDef::new("l", "Large")])])]);
    let field = catalog.field("size").unwrap();

    let controls = InputDispatcher::new(&catalog)
        .controls_for(field, field.operator("is").unwrap())
        .unwrap();

    assert_eq!(controls[1].selection(), Some("s"));
}

#[test]
fn given_static_value_but_only_field_source_offered_when_building_then_collects_as_field_comparison() {
    // Arrange
    let catalog = FieldCatalog::new(vec![
        FieldDef::new("width", "Width")
            .with_operator(OperatorDef::new("equals", "=", FieldType::Select))
            .with_options(vec![OptionDef::new("field", "Field")]),
        FieldDef::new("depth", "Depth"),
    ]);
    let data = Node::all(vec![Rule::new("width", "equals", json!("depth")).into()]);

    // Act
    let tree = TreeBuilder::new(&catalog).build(&data).unwrap();

    // Assert
    let rule = only_rule(&tree);
    assert_eq!(rule.values[0].selection(), Some("field"));
    assert_eq!(
        condtree::domain::collect(&tree).unwrap(),
        Node::all(vec![Rule::comparing_field("width", "equals", "depth").into()])
    );
}
