//! Lingo - build-time message extraction for TypeScript projects
//!
//! Lingo finds *message functions* (object properties whose function value
//! returns a static string), gives each message a stable hashed id, rewrites
//! the function body into an i18next lookup and collects every message into
//! a store that is emitted as a JSON dictionary and a gettext template.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, orchestration, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (matching, ids, rewriting, the shared store)
//! - `emit`: JSON and POT output
//! - `error`: Typed transform errors

pub mod cli;
pub mod config;
pub mod core;
pub mod emit;
pub mod error;
