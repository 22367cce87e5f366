//! JSDoc block parsing.
//!
//! Recognized tags:
//! - `@notranslate` - leave the message function untouched
//! - `@context <value>` - translation context for disambiguation
//! - `@param {type} name description` - translator hints for placeholders

use regex::Regex;
use std::sync::LazyLock;

pub const NO_TRANSLATE_TAG: &str = "notranslate";
pub const CONTEXT_TAG: &str = "context";
pub const PARAM_TAG: &str = "param";

static PARAM_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?([A-Za-z_$][\w$]*)").unwrap());

/// A single `@tag body` line (continuation lines are folded into `body`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    pub name: String,
    pub body: String,
}

/// Parsed `@param` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    pub name: String,
    pub type_expr: Option<String>,
    pub description: Option<String>,
}

/// A parsed `/** ... */` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Prose before the first tag, lines joined by a single space.
    pub description: String,
    pub tags: Vec<DocTag>,
}

impl DocComment {
    /// Parse the body of a block comment.
    ///
    /// # Arguments
    /// * `text` - Comment text with `/*` and `*/` already stripped (as swc
    ///   stores it). Only JSDoc blocks, whose text starts with `*`, parse.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.strip_prefix('*')?;

        let mut description: Vec<&str> = Vec::new();
        let mut tags: Vec<DocTag> = Vec::new();

        for raw_line in body.lines() {
            let line = raw_line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(tag_line) = line.strip_prefix('@') {
                let (name, rest) = tag_line
                    .split_once(char::is_whitespace)
                    .unwrap_or((tag_line, ""));
                tags.push(DocTag {
                    name: name.to_string(),
                    body: rest.trim().to_string(),
                });
            } else if let Some(last) = tags.last_mut() {
                if !last.body.is_empty() {
                    last.body.push(' ');
                }
                last.body.push_str(line);
            } else {
                description.push(line);
            }
        }

        Some(Self {
            description: description.join(" "),
            tags,
        })
    }

    /// Tag names compare case-insensitively (`@noTranslate` == `@notranslate`).
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Body of the first tag called `name`, if it has one.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .map(|t| t.body.as_str())
            .filter(|body| !body.is_empty())
    }

    pub fn context(&self) -> Option<&str> {
        self.tag_value(CONTEXT_TAG)
    }

    pub fn is_no_translate(&self) -> bool {
        self.has_tag(NO_TRANSLATE_TAG)
    }

    pub fn params(&self) -> Vec<ParamDoc> {
        self.tags
            .iter()
            .filter(|t| t.name.eq_ignore_ascii_case(PARAM_TAG))
            .filter_map(|t| parse_param(&t.body))
            .collect()
    }
}

/// Parse `{type} name - description`; the type and description are optional.
fn parse_param(body: &str) -> Option<ParamDoc> {
    let body = body.trim();
    let (type_expr, rest) = match body.strip_prefix('{') {
        Some(after) => {
            let close = matching_brace(after)?;
            (Some(after[..close].trim().to_string()), after[close + 1..].trim_start())
        }
        None => (None, body),
    };

    let name = PARAM_NAME_REGEX.captures(rest)?.get(1)?.as_str().to_string();

    // Skip the rest of the name token, including `[name=default]` forms.
    let after_name = rest
        .split_once(char::is_whitespace)
        .map(|(_, tail)| tail)
        .unwrap_or("");
    let description = after_name.trim_start_matches(['-', ' ']).trim();

    Some(ParamDoc {
        name,
        type_expr: type_expr.filter(|t| !t.is_empty()),
        description: (!description.is_empty()).then(|| description.to_string()),
    })
}

/// Index of the `}` closing an already-opened `{`, honouring nesting.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
