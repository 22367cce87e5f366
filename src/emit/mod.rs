//! Output artifacts built from a finished [`ExtractionStore`](crate::core::ExtractionStore).
//!
//! Emitters run after every transform of a pass has returned; they only read
//! the store.
//!
//! - `json`: flat `{ id: text }` dictionary for the i18next runtime
//! - `catalog`: gettext POT template for translators

pub mod catalog;
pub mod json;
