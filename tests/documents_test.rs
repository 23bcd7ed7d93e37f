//! Tests for loading and writing catalog and condition-tree documents

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;

use condtree::application::ApplicationError;
use condtree::domain::{DomainError, FieldType, Node, Rule};
use condtree::infrastructure::traits::{FileSystem, RealFileSystem};
use condtree::infrastructure::{DocumentStore, InfraError};

const CATALOG: &str = r#"[
  {"name": "age", "label": "Age", "operators": [
    {"name": "gt", "label": ">", "fieldType": "text"},
    {"name": "present", "fieldType": "none"}
  ]},
  {"name": "color", "operators": [{"name": "is", "fieldType": "select"}],
   "options": [{"name": "red", "label": "Red"}, {"name": "blue"}]}
]"#;

fn store() -> DocumentStore {
    DocumentStore::new(Arc::new(RealFileSystem))
}

/// Filesystem recording writes in memory.
#[derive(Default)]
struct MemoryFileSystem {
    written: Mutex<Vec<(String, String)>>,
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.written
            .lock()
            .unwrap()
            .push((path.display().to_string(), content.to_string()));
        Ok(())
    }
}

#[test]
fn given_catalog_file_when_loading_then_parses_fields() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fields.json");
    fs::write(&path, CATALOG).unwrap();

    // Act
    let fields = store().load_catalog(&path).unwrap();

    // Assert
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].operators[1].field_type, FieldType::None);
    assert_eq!(fields[0].operators[1].display_label(), "present");
    assert_eq!(fields[1].display_label(), "color");
    assert_eq!(fields[1].options[1].display_label(), "blue");
}

#[test]
fn given_operator_without_field_type_when_loading_then_defaults_to_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fields.json");
    fs::write(&path, r#"[{"name": "age", "operators": [{"name": "gt"}]}]"#).unwrap();

    let fields = store().load_catalog(&path).unwrap();

    assert_eq!(fields[0].operators[0].field_type, FieldType::Text);
}

#[test]
fn given_tree_file_when_loading_then_parses_node() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.json");
    fs::write(&path, r#"{"any": [{"name": "age", "operator": "gt", "value": 3}]}"#).unwrap();

    let node = store().load_tree(&path).unwrap();

    assert_eq!(node, Node::any(vec![Rule::new("age", "gt", json!(3)).into()]));
}

#[test]
fn given_invalid_json_when_loading_tree_then_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.json");
    fs::write(&path, "{ not json").unwrap();

    let err = store().load_tree(&path).unwrap_err();

    assert!(matches!(err, InfraError::Parse { ref path, .. } if path.ends_with("tree.json")));
}

#[test]
fn given_json_of_wrong_shape_when_loading_tree_then_reports_malformed_node() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.json");
    fs::write(&path, r#"{"some": []}"#).unwrap();

    let err = store().load_tree(&path).unwrap_err();

    assert!(matches!(
        err,
        InfraError::Application(ApplicationError::Domain(DomainError::MalformedNode { .. }))
    ));
}

#[test]
fn given_missing_file_when_loading_catalog_then_reports_io_error_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let err = store().load_catalog(&path).unwrap_err();

    assert!(matches!(err, InfraError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn given_tree_when_writing_then_reloads_equal() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("tree.json");
    let node = Node::all(vec![
        Rule::comparing_field("height", "equals", "weight").into(),
        Node::none(vec![]),
    ]);

    // Act
    store().write_tree(&path, &node, true).unwrap();

    // Assert
    assert_eq!(store().load_tree(&path).unwrap(), node);
}

#[test]
fn given_compact_output_when_writing_then_single_line() {
    let memory = Arc::new(MemoryFileSystem::default());
    let store = DocumentStore::new(memory.clone());

    store
        .write_tree(Path::new("tree.json"), &Node::any(vec![]), false)
        .unwrap();

    let written = memory.written.lock().unwrap();
    assert_eq!(written[0], ("tree.json".to_string(), "{\"any\":[]}\n".to_string()));
}
