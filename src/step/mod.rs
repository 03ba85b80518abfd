//! Step contracts implemented by wizard callers.

mod execute;
mod prompt;

pub use execute::*;
pub use prompt::*;
