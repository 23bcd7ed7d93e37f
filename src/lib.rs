//! condtree: editable all/any/none condition trees.
//!
//! A declarative tree (JSON) is rendered into a live, editable tree against a
//! field catalog; user interactions mutate the live tree and notify
//! subscribers; the collector reads the live tree back into its declarative
//! form.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
