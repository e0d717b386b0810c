//! HTTP handlers for content reads, form submissions and diagnostics.

pub mod content;
pub mod diagnostic;
pub mod submission;
pub use content::*;
pub use diagnostic::*;
pub use submission::*;
