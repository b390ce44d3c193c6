pub mod generate;
pub mod io;
pub mod models;
pub mod parsing;
pub mod reconcile;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use generate::{GenerateError, GenerateOptions, Generated, Generator};
pub use io::*;
pub use models::*;
pub use reconcile::{ConsistencyReport, ConsistencyWarning, ReconcileError};
pub use store::{BlockMatch, DocStore, SectionMatches, TocEntry};
