pub mod content;
pub mod document;

pub use content::*;
pub use document::*;
