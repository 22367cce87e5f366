//! Message extraction engine.
//!
//! One pass over a project looks like this:
//!
//! 1. `file_scanner` lists the source files to process;
//! 2. `transform` parses each file, finds message functions through
//!    `extract` and `collect`, records them in a shared `store` and rewrites
//!    the file with `rewrite`;
//! 3. the emitters in `crate::emit` read the store once every file is done.
//!
//! ## Module Structure
//!
//! - `collect`: doc comments on message functions
//! - `data`: SourceMessage and SourceLocation
//! - `extract`: literal folding and the message function matcher
//! - `file_scanner`: include/ignore aware source discovery
//! - `hash`: stable, collision-free message ids
//! - `intern`: the shared string pool
//! - `parsers`: swc parsing
//! - `rewrite`: span splicing with source maps
//! - `store`: the pass-wide message registry
//! - `transform`: the per-file entry point

pub mod collect;
pub mod data;
pub mod extract;
pub mod file_scanner;
pub mod hash;
pub mod intern;
pub mod parsers;
pub mod rewrite;
pub mod store;
pub mod transform;

pub use data::{SourceLocation, SourceMessage};
pub use store::ExtractionStore;
pub use transform::{ArgMode, TransformOptions, TransformOutput, transform};
