//! Documentation comments attached to message functions.
//!
//! ## Module Structure
//!
//! - `doc`: JSDoc block parsing (`@notranslate`, `@context`, `@param`)
//! - `lookup`: structured-then-raw lookup of the doc for a function

pub mod doc;
pub mod lookup;

pub use doc::{DocComment, ParamDoc};
pub use lookup::{CommentLookup, ResolvedDoc};
