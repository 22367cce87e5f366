//! Message function extraction.
//!
//! - `literal`: folding of string literals, static templates and `+` chains
//! - `matcher`: the AST visitor that recognizes message functions

pub mod literal;
pub mod matcher;

pub use matcher::{CandidateMessage, MessageCollector, MessageParam, MessageShape};
