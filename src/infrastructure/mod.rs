//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod documents;
pub mod error;
pub mod error_ext;
pub mod traits;

pub use documents::DocumentStore;
pub use error::{InfraError, InfraResult};
pub use error_ext::IoResultExt;
