//! The per-file transform entry point shared by every build integration.
//!
//! ```text
//! source ─ parse ─ MessageCollector ─┬─ context + comments ─ id ─ ExtractionStore::add
//!                                    └─ CodeRewriter (call expression, import) ─ {code, map}
//! ```
//!
//! The transform is synchronous and does no I/O. It may run concurrently
//! for different files of one pass as long as they share one store.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use swc_common::Spanned;
use swc_ecma_ast::{Expr, ImportSpecifier, Lit, Module, ModuleDecl, ModuleItem, Stmt};
use swc_ecma_visit::VisitWith;

use crate::core::{
    data::{SourceLocation, SourceMessage},
    extract::matcher::{CandidateMessage, MessageCollector},
    hash::{DEFAULT_HASH_LENGTH, MAX_HASH_LENGTH, MIN_HASH_LENGTH},
    parsers::source::{ParsedSource, parse_module, parse_prefix},
    rewrite::{CodeRewriter, source_map::SourceMapV3},
    store::ExtractionStore,
};
use crate::error::TransformError;

/// Marker wrapped around every call in debug mode.
pub const DEBUG_PREFIX: &str = "⟦";
pub const DEBUG_SUFFIX: &str = "⟧";

/// How interpolation values are handed to the runtime lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArgMode {
    /// `{ name }` - shorthand properties keyed by parameter name.
    #[default]
    Named,
    /// `{ "0": name }` - keyed by parameter position.
    Indexed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub arg_mode: ArgMode,
    /// Embed the source text as `defaultValue`.
    pub set_default_value: bool,
    /// Wrap each call in a template literal with visible markers.
    pub debug: bool,
    /// Number of hex digits in a fresh id (4..=40).
    pub hash_length: usize,
    /// Identifier the runtime is imported as, e.g. `i18next`.
    pub runtime_id: String,
    /// Module the runtime is imported from.
    pub runtime_module: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            arg_mode: ArgMode::default(),
            set_default_value: false,
            debug: false,
            hash_length: DEFAULT_HASH_LENGTH,
            runtime_id: "i18next".to_string(),
            runtime_module: "i18next".to_string(),
        }
    }
}

impl TransformOptions {
    pub fn validate(&self) -> Result<(), TransformError> {
        if !(MIN_HASH_LENGTH..=MAX_HASH_LENGTH).contains(&self.hash_length) {
            return Err(TransformError::InvalidOptions(format!(
                "hash length must be between {} and {}, got {}",
                MIN_HASH_LENGTH, MAX_HASH_LENGTH, self.hash_length
            )));
        }
        if !is_identifier(&self.runtime_id) {
            return Err(TransformError::InvalidOptions(format!(
                "runtime id {:?} is not a valid identifier",
                self.runtime_id
            )));
        }
        Ok(())
    }
}

/// Result of transforming one file.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    /// `None` when nothing changed.
    pub map: Option<SourceMapV3>,
    pub filename: String,
    /// `false` means `code` is the input verbatim and can be skipped.
    pub did_transform: bool,
    /// Number of message functions rewritten.
    pub message_count: usize,
    /// Number of message functions skipped for `@notranslate`.
    pub exempted_count: usize,
}

impl TransformOutput {
    fn unchanged(source: &str, filename: &str, exempted_count: usize) -> Self {
        Self {
            code: source.to_string(),
            map: None,
            filename: filename.to_string(),
            did_transform: false,
            message_count: 0,
            exempted_count,
        }
    }
}

/// A parsed file whose messages have been found but not yet given ids.
///
/// Preparing touches no shared state, so files can be prepared in parallel
/// and then applied in a fixed order. That order decides which of two
/// colliding texts keeps the short id.
#[derive(Debug, Clone)]
pub struct PreparedFile {
    pub filename: String,
    pub candidates: Vec<CandidateMessage>,
    pub exempted_count: usize,
    /// Where the runtime import goes; `None` when the file already binds it.
    import: Option<ImportPosition>,
}

/// Parse `source` and collect its message functions.
///
/// A fatal syntax error does not discard the whole file: the lines in front
/// of it are parsed on their own and only what follows the last parseable
/// line is left alone.
pub fn prepare(source: &str, filename: &str, options: &TransformOptions) -> PreparedFile {
    let parsed = match parse_module(source.to_string(), filename) {
        Ok(parsed) => Some(parsed),
        Err(failure) => {
            let prefix = parse_prefix(source, filename, failure.offset);
            match &prefix {
                Some(parsed) => tracing::warn!(
                    file = filename,
                    error = %failure,
                    parsed_bytes = parsed.offset(parsed.module.span.hi),
                    "syntax error, extracting from the code in front of it"
                ),
                None => tracing::warn!(
                    file = filename,
                    error = %failure,
                    "skipping file that could not be parsed"
                ),
            }
            prefix
        }
    };

    let Some(parsed) = parsed else {
        return PreparedFile {
            filename: filename.to_string(),
            candidates: Vec::new(),
            exempted_count: 0,
            import: None,
        };
    };

    let mut collector = MessageCollector::new(&parsed, source);
    parsed.module.visit_with(&mut collector);

    PreparedFile {
        filename: filename.to_string(),
        exempted_count: collector.exempted,
        import: (!imports_binding(&parsed.module, &options.runtime_id))
            .then(|| import_position(&parsed)),
        candidates: collector.candidates,
    }
}

impl PreparedFile {
    /// Assign ids, record the messages in `store` and rewrite `source`.
    ///
    /// `source` must be the text this file was prepared from.
    pub fn apply(
        &self,
        source: &str,
        options: &TransformOptions,
        store: &ExtractionStore,
    ) -> Result<TransformOutput, TransformError> {
        let filename = self.filename.as_str();
        if self.candidates.is_empty() {
            return Ok(TransformOutput::unchanged(source, filename, self.exempted_count));
        }

        let mut rewriter = CodeRewriter::new(source);
        for candidate in &self.candidates {
            let id = record(candidate, filename, options, store)?;
            tracing::debug!(
                file = filename,
                property = %candidate.property,
                shape = ?candidate.shape,
                id = %id,
                "extracted message"
            );
            rewriter.overwrite(candidate.replace.clone(), call_expression(&id, candidate, options));
        }

        if let Some(position) = &self.import {
            let import = format!(
                "import {} from {};",
                options.runtime_id,
                js_string_literal(&options.runtime_module)
            );
            match *position {
                ImportPosition::Before(at) => rewriter.insert(at, format!("{}\n", import)),
                ImportPosition::After(at) => rewriter.insert(at, format!("\n{}", import)),
            }
        }

        let (code, map) = rewriter.finish(filename);
        Ok(TransformOutput {
            code,
            map: Some(map),
            filename: filename.to_string(),
            did_transform: true,
            message_count: self.candidates.len(),
            exempted_count: self.exempted_count,
        })
    }
}

/// Transform one source file.
///
/// Every message function found is recorded in `store` and its returned
/// expression replaced by `<runtime>.t("<id>", ...)`. Files that fail to
/// parse come back unchanged past the first unparseable line.
pub fn transform(
    source: &str,
    filename: &str,
    options: &TransformOptions,
    store: &ExtractionStore,
) -> Result<TransformOutput, TransformError> {
    prepare(source, filename, options).apply(source, options, store)
}

/// Allocate the id for a candidate and add it to the store.
fn record(
    candidate: &CandidateMessage,
    filename: &str,
    options: &TransformOptions,
    store: &ExtractionStore,
) -> Result<String, TransformError> {
    let source_text = store.intern(&candidate.text);
    let context = candidate.doc.as_ref().and_then(|doc| doc.context());
    let id = store.assign_id(source_text.clone(), context, options.hash_length)?;

    store.add(SourceMessage {
        id: id.clone(),
        source_text,
        translation_context: context.map(str::to_string),
        parameter_names: candidate.params.iter().map(|p| p.name.clone()).collect(),
        referencing_locations: BTreeSet::from([SourceLocation::new(
            filename,
            candidate.line,
            candidate.col,
        )]),
        extracted_comments: translator_comment(candidate).into_iter().collect(),
    });

    Ok(id)
}

/// Build `<runtime>.t("<id>"[, { ... }])`, optionally wrapped in the debug marker.
pub fn call_expression(id: &str, candidate: &CandidateMessage, options: &TransformOptions) -> String {
    let mut props: Vec<String> = Vec::new();
    if options.set_default_value {
        props.push(format!("defaultValue: {}", js_string_literal(&candidate.text)));
    }
    for param in &candidate.params {
        props.push(match options.arg_mode {
            ArgMode::Named => param.name.clone(),
            ArgMode::Indexed => format!("\"{}\": {}", param.index, param.name),
        });
    }

    let call = if props.is_empty() {
        format!("{}.t(\"{}\")", options.runtime_id, id)
    } else {
        format!("{}.t(\"{}\", {{ {} }})", options.runtime_id, id, props.join(", "))
    };

    if options.debug {
        format!("`{}${{{}}}{}`", DEBUG_PREFIX, call, DEBUG_SUFFIX)
    } else {
        call
    }
}

/// Translator hint: doc prose, then one `name: type - description` line per
/// parameter.
fn translator_comment(candidate: &CandidateMessage) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    let documented = candidate
        .doc
        .as_ref()
        .map(|doc| doc.params())
        .unwrap_or_default();

    if let Some(doc) = &candidate.doc
        && !doc.description.is_empty()
    {
        lines.push(doc.description.clone());
    }

    for param in &candidate.params {
        let param_doc = documented.iter().find(|d| d.name == param.name);
        let mut line = param.name.clone();
        if let Some(ty) = param_doc
            .and_then(|d| d.type_expr.as_deref())
            .or(param.type_annotation.as_deref())
        {
            line.push_str(": ");
            line.push_str(ty);
        }
        if let Some(description) = param_doc.and_then(|d| d.description.as_deref()) {
            line.push_str(" - ");
            line.push_str(description);
        }
        lines.push(line);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Does any value import bind `name` locally? Type-only imports are erased
/// at compile time and do not count.
fn imports_binding(module: &Module, name: &str) -> bool {
    module.body.iter().any(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) if !import.type_only => {
            import.specifiers.iter().any(|spec| {
                let local = match spec {
                    ImportSpecifier::Named(s) if s.is_type_only => return false,
                    ImportSpecifier::Named(s) => &s.local,
                    ImportSpecifier::Default(s) => &s.local,
                    ImportSpecifier::Namespace(s) => &s.local,
                };
                local.sym.as_str() == name
            })
        }
        _ => false,
    })
}

#[derive(Debug, Clone, Copy)]
enum ImportPosition {
    /// In front of the item starting at this offset.
    Before(usize),
    /// After the directive ending at this offset; the file has nothing else.
    After(usize),
}

/// Where the runtime import goes: in front of the first top-level statement
/// after the directive prologue (`"use client";` etc.).
fn import_position(parsed: &ParsedSource) -> ImportPosition {
    let body = &parsed.module.body;
    match body.iter().find(|item| !is_directive(item)) {
        Some(item) => ImportPosition::Before(parsed.offset(item.span().lo)),
        None => match body.last() {
            Some(last) => ImportPosition::After(parsed.offset(last.span().hi)),
            None => ImportPosition::Before(0),
        },
    }
}

fn is_directive(item: &ModuleItem) -> bool {
    matches!(
        item,
        ModuleItem::Stmt(Stmt::Expr(stmt)) if matches!(&*stmt.expr, Expr::Lit(Lit::Str(_)))
    )
}

/// Double-quoted JavaScript string literal.
pub fn js_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
