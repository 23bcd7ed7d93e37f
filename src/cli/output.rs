//! Terminal output for condtree commands
//!
//! Documents (JSON, rendered trees) go to stdout uncolored so they can be
//! piped. Status lines go to stderr. `colored` honours NO_COLOR and
//! CLICOLOR_FORCE.

use std::fmt::Display;
use std::path::Path;

use colored::Colorize;

use crate::domain::{FieldDef, OperatorDef};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(err: &impl Display) {
    eprintln!("{}: {}", "error".red().bold(), err);
}

/// JSON document or rendered tree, verbatim.
pub fn document(text: &impl Display) {
    println!("{}", text);
}

/// Status line of `condtree edit -o`.
pub fn written(updates: usize, path: &Path) {
    let noun = if updates == 1 { "update" } else { "updates" };
    eprintln!("{} {} {}, written to {}", "✓".green(), updates, noun, path.display());
}

/// Field heading of `condtree fields`.
pub fn field(field: &FieldDef) {
    println!(
        "{} {}",
        field.name.cyan().bold(),
        format!("({})", field.display_label()).dimmed()
    );
}

/// Operator line below a field heading.
pub fn operator(operator: &OperatorDef) {
    println!(
        "  {:<12} {:<16} {}",
        operator.name,
        operator.display_label(),
        operator.field_type.as_str().yellow()
    );
}

pub fn location(label: &str, location: &impl Display) {
    println!("{}: {}", label.green(), location);
}
