//! Domain layer: condition trees, catalog and the live editable mirror
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod catalog;
pub mod collector;
pub mod controls;
pub mod dispatch;
pub mod entities;
pub mod error;
pub mod display;

pub use arena::{LiveConditional, LiveContent, LiveNode, LiveRule, LiveTree, NodePath};
pub use builder::TreeBuilder;
pub use catalog::{FieldCatalog, FieldDef, FieldType, OperatorDef, OptionDef, ValueSource};
pub use collector::collect;
pub use controls::{make_option, Choice, SelectOption, ValueControl};
pub use dispatch::InputDispatcher;
pub use display::TreeNodeConvert;
pub use entities::*;
pub use error::{DomainError, DomainResult};
