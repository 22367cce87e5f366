use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap, Spanned,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments extracted from SingleThreadedComments right after parsing, so the
/// parse result can cross thread boundaries.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Comments swc attached in front of the token starting at `pos`.
    pub fn leading_at(&self, pos: BytePos) -> &[Comment] {
        self.leading.get(&pos).map(Vec::as_slice).unwrap_or_default()
    }
}

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    /// Position of the first byte of the file inside `source_map`.
    pub start_pos: BytePos,
}

impl ParsedSource {
    /// Byte offset of `pos` into the original source text.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    /// 1-indexed line and column of `pos`.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col.0 + 1)
    }
}

/// Pick TSX for `.tsx`/`.jsx` files; everything else parses as plain
/// TypeScript so `<T>value` assertions and generic arrows keep working.
pub fn syntax_for(file_path: &str) -> Syntax {
    let tsx = file_path.ends_with(".tsx") || file_path.ends_with(".jsx");
    Syntax::Typescript(TsSyntax {
        tsx,
        ..Default::default()
    })
}

/// An unrecoverable syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFailure {
    pub message: String,
    /// Byte offset of the error in the source text.
    pub offset: usize,
}

impl fmt::Display for SyntaxFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl std::error::Error for SyntaxFailure {}

/// Parse TypeScript/TSX source code into an AST.
///
/// Recoverable syntax errors are swallowed by swc and still yield a module;
/// only unrecoverable ones are returned as `Err`.
pub fn parse_source(code: String, file_path: &str) -> Result<ParsedSource> {
    parse_module(code, file_path).map_err(|e| anyhow!("Failed to parse {}: {}", file_path, e))
}

/// Like [`parse_source`], keeping the position of a fatal error.
pub fn parse_module(code: String, file_path: &str) -> Result<ParsedSource, SyntaxFailure> {
    use swc_common::GLOBALS;

    let source_map: Arc<SourceMap> = Default::default();

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);
        let start_pos = source_file.start_pos;

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser.parse_module().map_err(|e| SyntaxFailure {
            message: e.kind().msg().to_string(),
            offset: e.span().lo.0.saturating_sub(start_pos.0) as usize,
        })?;

        let recovered = parser.take_errors();
        if !recovered.is_empty() {
            tracing::debug!(
                file = file_path,
                count = recovered.len(),
                "recovered from syntax errors"
            );
        }

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map: Arc::clone(&source_map),
            comments: extracted_comments,
            start_pos,
        })
    })
}

/// Parse the longest run of whole lines in front of a fatal error.
///
/// Cut points are line ends, tried from the error backwards. The first
/// prefix that parses into at least one item wins; its byte offsets are
/// valid offsets into the full `code`. `None` when no such prefix exists.
pub fn parse_prefix(code: &str, file_path: &str, error_offset: usize) -> Option<ParsedSource> {
    let mut head = code.get(..error_offset).unwrap_or(code);
    while let Some(newline) = head.rfind('\n') {
        let prefix = &code[..=newline];
        if let Ok(parsed) = parse_module(prefix.to_string(), file_path)
            && !parsed.module.body.is_empty()
        {
            return Some(parsed);
        }
        head = &code[..newline];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typescript_module() {
        let parsed = parse_source(
            "export const m = { a: (): string => \"A\" };".to_string(),
            "m.ts",
        )
        .unwrap();
        assert_eq!(parsed.module.body.len(), 1);
    }

    #[test]
    fn test_type_assertion_parses_outside_tsx() {
        let parsed = parse_source("const n = <number>value;".to_string(), "n.ts");
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_jsx_parses_in_tsx() {
        let parsed = parse_source("const el = <div>Hi</div>;".to_string(), "el.tsx");
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_unrecoverable_error_is_err() {
        assert!(parse_source("const = = {".to_string(), "broken.ts").is_err());
    }

    #[test]
    fn test_syntax_failure_keeps_offset() {
        let code = "const a = 1;\nexport function broken( {\n";
        let failure = parse_module(code.to_string(), "broken.ts").err().unwrap();
        assert!(failure.offset > "const a = 1;\n".len());
        assert!(failure.offset <= code.len());
    }

    #[test]
    fn test_parse_prefix_stops_before_broken_statement() {
        let code = "const a = 1;\nconst b = 2;\nexport function broken( {\n";
        let failure = parse_module(code.to_string(), "broken.ts").err().unwrap();
        let parsed = parse_prefix(code, "broken.ts", failure.offset).unwrap();
        assert_eq!(parsed.module.body.len(), 2);
    }

    #[test]
    fn test_parse_prefix_without_valid_lines() {
        let code = "const broken = {\n  a: 1,\n";
        let failure = parse_module(code.to_string(), "broken.ts").err().unwrap();
        assert!(parse_prefix(code, "broken.ts", failure.offset).is_none());
    }

    #[test]
    fn test_offsets_and_positions() {
        use swc_common::Spanned;

        let code = "\nconst x = 1;".to_string();
        let parsed = parse_source(code, "x.ts").unwrap();
        let lo = parsed.module.body[0].span().lo;
        assert_eq!(parsed.offset(lo), 1);
        assert_eq!(parsed.line_col(lo), (2, 1));
    }

    #[test]
    fn test_leading_comments_are_kept() {
        let parsed = parse_source("/** doc */\nconst x = 1;".to_string(), "x.ts").unwrap();
        assert_eq!(parsed.comments.leading.len(), 1);
    }
}
