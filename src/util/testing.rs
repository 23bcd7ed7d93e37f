//! Test support: tracing setup and a shared field catalog.

use std::sync::Once;

use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{FieldCatalog, FieldDef, FieldType, OperatorDef, OptionDef};

static TEST_SETUP: Once = Once::new();

/// Install the test subscriber once per test binary.
///
/// `RUST_LOG` wins when set; otherwise everything from this crate is traced.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("condtree=trace"));
        let installed = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(filter),
            )
            .try_init();
        // Another subscriber may already be global in this binary
        if installed.is_ok() {
            info!("test logging ready");
        }
    });
}

/// Catalog covering every dispatch path:
///
/// - `age`: text operators `gt`, `lt`
/// - `height`: select `equals` with a `static` text source and a `field`
///   source over `age` / `weight`
/// - `color`: select `is` over the plain options `red`, `blue`
/// - `notes`: `contains` (textarea), `present` (none)
pub fn sample_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("age", "Age")
            .with_operator(OperatorDef::new("gt", ">", FieldType::Text))
            .with_operator(OperatorDef::new("lt", "<", FieldType::Text)),
        FieldDef::new("height", "Height")
            .with_operator(OperatorDef::new("equals", "=", FieldType::Select))
            .with_options(vec![
                OptionDef::new("static", "Value").with_field_type(FieldType::Text),
                OptionDef::new("field", "Field")
                    .with_options(vec![OptionDef::new("age", "Age"), OptionDef::new("weight", "Weight")]),
            ]),
        FieldDef::new("color", "Color")
            .with_operator(OperatorDef::new("is", "is", FieldType::Select))
            .with_options(vec![OptionDef::new("red", "Red"), OptionDef::new("blue", "Blue")]),
        FieldDef::new("notes", "Notes")
            .with_operator(OperatorDef::new("contains", "contains", FieldType::Textarea))
            .with_operator(OperatorDef::new("present", "is present", FieldType::None)),
    ]
}

pub fn sample_catalog() -> FieldCatalog {
    FieldCatalog::new(sample_fields())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup_is_idempotent() {
        init_test_setup();
        init_test_setup();
    }

    #[test]
    fn test_sample_catalog_order() {
        let catalog = sample_catalog();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["age", "height", "color", "notes"]);
    }
}
