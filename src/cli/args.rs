//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use serde_json::Value;

use crate::domain::{CombinatorKind, NodePath};

/// Edit all/any/none condition trees against a field catalog
#[derive(Parser, Debug)]
#[command(name = "condtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .condtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a condition tree and show its structure
    Tree {
        /// Field catalog (JSON array of fields)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
        /// Condition tree (JSON); empty tree when omitted
        #[arg(value_hint = ValueHint::FilePath)]
        data: Option<PathBuf>,
    },

    /// Render a condition tree and collect it back to JSON
    Collect {
        /// Field catalog (JSON array of fields)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
        /// Condition tree (JSON); empty tree when omitted
        #[arg(value_hint = ValueHint::FilePath)]
        data: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Apply editor actions, then print the collected tree
    Edit {
        /// Field catalog (JSON array of fields)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
        /// Condition tree (JSON); empty tree when omitted
        #[arg(value_hint = ValueHint::FilePath)]
        data: Option<PathBuf>,
        /// VERB:PATH[=ARG], e.g. add-condition:/ or value:/0=30
        #[arg(short, long = "action", value_parser = parse_action)]
        actions: Vec<EditAction>,
        /// Write the result to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// List catalog fields and their operators
    Fields {
        /// Field catalog (JSON array of fields)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}

/// Interaction applied by `condtree edit`.
#[derive(Debug, Clone, PartialEq)]
pub enum EditVerb {
    AddCondition,
    AddSubCondition,
    Remove,
    Kind(CombinatorKind),
    Field(String),
    Operator(String),
    Value(Value),
    Source(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditAction {
    pub path: NodePath,
    pub verb: EditVerb,
}

/// Parse `VERB:PATH[=ARG]`.
pub fn parse_action(s: &str) -> Result<EditAction, String> {
    let (verb, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("expected VERB:PATH[=ARG], got '{}'", s))?;
    let (path, arg) = match rest.split_once('=') {
        Some((path, arg)) => (path, Some(arg)),
        None => (rest, None),
    };
    let path: NodePath = path.parse().map_err(|e| format!("{}", e))?;
    let required = |name: &str| arg.map(str::to_string).ok_or_else(|| format!("'{}' needs =ARG", name));

    let verb = match verb {
        "add-condition" => EditVerb::AddCondition,
        "add-sub-condition" => EditVerb::AddSubCondition,
        "remove" => EditVerb::Remove,
        "kind" => EditVerb::Kind(required(verb)?.parse().map_err(|e| format!("{}", e))?),
        "field" => EditVerb::Field(required(verb)?),
        "operator" => EditVerb::Operator(required(verb)?),
        "value" => {
            let raw = required(verb)?;
            EditVerb::Value(serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
        }
        "source" => EditVerb::Source(required(verb)?),
        other => return Err(format!("unknown action '{}'", other)),
    };
    Ok(EditAction { path, verb })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("add-condition:/", EditVerb::AddCondition, "/")]
    #[case("remove:/0/1", EditVerb::Remove, "/0/1")]
    #[case("kind:/=any", EditVerb::Kind(CombinatorKind::Any), "/")]
    #[case("value:/0=30", EditVerb::Value(serde_json::json!(30)), "/0")]
    #[case("value:/0=bob", EditVerb::Value(serde_json::json!("bob")), "/0")]
    #[case("source:/2=field", EditVerb::Source("field".into()), "/2")]
    fn test_parse_action(#[case] input: &str, #[case] verb: EditVerb, #[case] path: &str) {
        let action = parse_action(input).unwrap();
        assert_eq!(action.verb, verb);
        assert_eq!(action.path.to_string(), path);
    }

    #[rstest]
    #[case("add-condition")]
    #[case("frobnicate:/")]
    #[case("field:/0")]
    #[case("kind:/=most")]
    #[case("remove:0")]
    fn test_parse_action_rejects(#[case] input: &str) {
        assert!(parse_action(input).is_err());
    }
}
