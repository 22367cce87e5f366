//! Gettext POT template output.
//!
//! Each message becomes one entry keyed by its id:
//!
//! ```text
//! #. Greeting on the dashboard
//! #. name: string - the user's first name
//! #: src/messages.ts:4:3
//! msgctxt "8ee14abac6"
//! msgid "Welcome back, {{name}}!"
//! msgstr ""
//! ```
//!
//! The id goes in `msgctxt` so entries with the same text but different
//! translation contexts stay distinct.

use std::path::Path;

use anyhow::Result;

use crate::core::ExtractionStore;
#[cfg(not(feature = "catalog"))]
use crate::error::TransformError;

#[cfg(feature = "catalog")]
use {
    anyhow::Context,
    polib::{catalog::Catalog, message::Message, metadata::CatalogMetadata, po_file},
    std::fs,
};

/// Build the template, entries in id order.
#[cfg(feature = "catalog")]
pub fn build(store: &ExtractionStore) -> Catalog {
    let mut metadata = CatalogMetadata::new();
    metadata.project_id_version = format!("lingo {}", env!("CARGO_PKG_VERSION"));
    metadata.mime_version = String::from("1.0");
    metadata.content_type = String::from("text/plain; charset=UTF-8");
    metadata.content_transfer_encoding = String::from("8bit");

    let mut catalog = Catalog::new(metadata);
    for message in store.all() {
        let comments: Vec<&str> = message
            .extracted_comments
            .iter()
            .flat_map(|comment| comment.lines())
            .collect();
        let references: Vec<String> = message
            .referencing_locations
            .iter()
            .map(ToString::to_string)
            .collect();

        catalog.append_or_update(
            Message::build_singular()
                .with_comments(comments.join("\n"))
                .with_source(references.join("\n"))
                .with_msgctxt(message.id.clone())
                .with_msgid(message.source_text.to_string())
                .with_msgstr(String::new())
                .done(),
        );
    }
    catalog
}

/// Write the template to `path`, creating parent directories.
#[cfg(feature = "catalog")]
pub fn write(store: &ExtractionStore, path: &Path) -> Result<()> {
    let catalog = build(store);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    po_file::write(&catalog, path)
        .with_context(|| format!("Failed to write catalog: {}", path.display()))?;

    Ok(())
}

#[cfg(not(feature = "catalog"))]
pub fn write(_store: &ExtractionStore, _path: &Path) -> Result<()> {
    Err(TransformError::CatalogUnavailable.into())
}
