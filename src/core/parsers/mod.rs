//! Source parsing.
//!
//! - `source`: TypeScript/TSX parser (uses swc for AST generation)

pub mod source;
