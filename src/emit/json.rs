use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::core::ExtractionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOptions {
    /// Nest the dictionary under this key, e.g. i18next's `translation`.
    pub top_level_key: Option<String>,
    /// Spaces per level; `0` writes compact JSON.
    pub indent: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            top_level_key: None,
            indent: 2,
        }
    }
}

/// Render the store as `{ "<id>": "<source text>" }`, sorted by id, with a
/// trailing newline.
pub fn render(store: &ExtractionStore, options: &JsonOptions) -> Result<String> {
    let dictionary: Map<String, Value> = store
        .all()
        .into_iter()
        .map(|message| (message.id, Value::String(message.source_text.to_string())))
        .collect();

    let root = match &options.top_level_key {
        Some(key) => {
            let mut wrapper = Map::new();
            wrapper.insert(key.clone(), Value::Object(dictionary));
            wrapper
        }
        None => dictionary,
    };

    let content = if options.indent == 0 {
        serde_json::to_string(&root).context("Failed to serialize JSON")?
    } else {
        let indent = " ".repeat(options.indent);
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        root.serialize(&mut serializer)
            .context("Failed to serialize JSON")?;
        String::from_utf8(buf).context("Serialized JSON is not UTF-8")?
    };

    Ok(format!("{}\n", content))
}

/// Render and write to `path`, creating parent directories.
pub fn write(store: &ExtractionStore, options: &JsonOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, render(store, options)?)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}
