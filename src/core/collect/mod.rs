//! Comment collection for message functions.
//!
//! Doc comments decide whether a function is exempt (`@notranslate`), which
//! translation context it belongs to (`@context`) and what translators are
//! told about its parameters (`@param`).

pub mod comments;

pub use comments::{CommentLookup, DocComment, ParamDoc, ResolvedDoc};
