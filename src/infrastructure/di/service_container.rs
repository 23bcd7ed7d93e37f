//! Service container for dependency injection
//!
//! Wires up the editor and document store with their dependencies.

use std::sync::Arc;

use crate::application::{ConditionsEditor, EditorOptions};
use crate::config::Settings;
use crate::domain::{FieldDef, Node};
use crate::infrastructure::documents::DocumentStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn documents(&self) -> DocumentStore {
        DocumentStore::new(Arc::clone(&self.fs))
    }

    /// Editor configured from the settings.
    pub fn editor(&self, options: EditorOptions) -> ConditionsEditor {
        ConditionsEditor::with_settings(options, &self.settings.editor)
    }

    /// Editor seeded with a catalog and optional data.
    pub fn editor_for(&self, fields: Vec<FieldDef>, data: Option<Node>) -> ConditionsEditor {
        self.editor(EditorOptions { fields, data })
    }
}
