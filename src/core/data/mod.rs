//! Core data types shared by the matcher, the store and the emitters.
//!
//! - `message`: SourceMessage and SourceLocation

pub mod message;

pub use message::{SourceLocation, SourceMessage};
