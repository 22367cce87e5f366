//! Message function recognition.
//!
//! A *message function* is an object-literal property whose value is a
//! function returning a compile-time string. Four syntactic shapes qualify:
//!
//! ```typescript
//! const messages = {
//!   a: () => "Hello",                           // ArrowExpr
//!   b: (name: string) => { return "Hi"; },      // ArrowBlock
//!   c: function () { return "Hey"; },           // FunctionExpr
//!   d() { return "Yo"; },                       // MethodShorthand
//! };
//! ```
//!
//! Block bodies must consist of exactly one `return <expr>;`. `async` and
//! generator functions never qualify. Functions documented with
//! `@notranslate` are skipped, but their descendants are still visited.

use std::ops::Range;

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, Expr, Function, ObjectLit, Pat, Prop, PropName,
    PropOrSpread, Stmt,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::collect::comments::{CommentLookup, DocComment};
use crate::core::extract::literal::fold_string;
use crate::core::parsers::source::ParsedSource;

/// Syntactic form of a recognized message function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageShape {
    /// `() => "text"`
    ArrowExpr,
    /// `() => { return "text"; }`
    ArrowBlock,
    /// `function () { return "text"; }`
    FunctionExpr,
    /// `name() { return "text"; }`
    MethodShorthand,
}

/// An identifier parameter of a message function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageParam {
    /// Position in the original parameter list.
    pub index: usize,
    pub name: String,
    /// Source text of the TypeScript annotation, e.g. `string`.
    pub type_annotation: Option<String>,
}

/// A message function found in one file.
#[derive(Debug, Clone)]
pub struct CandidateMessage {
    pub shape: MessageShape,
    /// Property key, for diagnostics.
    pub property: String,
    /// Folded literal text.
    pub text: String,
    /// Byte range of the returned expression; the only span rewritten.
    pub replace: Range<usize>,
    /// Identifier parameters; destructuring patterns are dropped.
    pub params: Vec<MessageParam>,
    pub doc: Option<DocComment>,
    /// 1-indexed position of the property.
    pub line: usize,
    pub col: usize,
}

/// The function node behind a property, before shape analysis.
enum FunctionNode<'n> {
    Arrow(&'n ArrowExpr),
    Function(&'n Function, MessageShape),
}

/// Visitor collecting [`CandidateMessage`]s from a parsed module.
///
/// # Usage
///
/// ```ignore
/// let mut collector = MessageCollector::new(&parsed, &source);
/// parsed.module.visit_with(&mut collector);
/// for candidate in collector.candidates { ... }
/// ```
pub struct MessageCollector<'a> {
    parsed: &'a ParsedSource,
    source: &'a str,
    lookup: CommentLookup<'a>,
    pub candidates: Vec<CandidateMessage>,
    /// Message functions skipped because of `@notranslate`.
    pub exempted: usize,
}

impl<'a> MessageCollector<'a> {
    pub fn new(parsed: &'a ParsedSource, source: &'a str) -> Self {
        Self {
            parsed,
            source,
            lookup: CommentLookup::new(&parsed.comments, source),
            candidates: Vec::new(),
            exempted: 0,
        }
    }

    fn check_prop(&mut self, prop: &Prop, prev_end: Option<BytePos>, object_lo: BytePos) {
        let (key, node, function_lo) = match prop {
            Prop::KeyValue(kv) => {
                let node = match &*kv.value {
                    Expr::Arrow(arrow) => FunctionNode::Arrow(arrow),
                    Expr::Fn(fn_expr) => {
                        FunctionNode::Function(&fn_expr.function, MessageShape::FunctionExpr)
                    }
                    _ => return,
                };
                (&kv.key, node, kv.value.span().lo)
            }
            Prop::Method(method) => (
                &method.key,
                FunctionNode::Function(&method.function, MessageShape::MethodShorthand),
                method.function.span.lo,
            ),
            _ => return,
        };

        let Some((shape, body, params)) = analyze(&node) else {
            return;
        };
        let Some(text) = fold_string(body) else {
            tracing::trace!(property = %prop_name(key), "return value is not a static string");
            return;
        };

        let prop_lo = key.span().lo.min(function_lo);
        let raw_range = self.raw_buffer(prev_end, object_lo, prop_lo, function_lo);
        let resolved = self.lookup.resolve(&[prop_lo, function_lo], raw_range);
        if resolved.no_translate {
            tracing::trace!(property = %prop_name(key), "skipping @notranslate message");
            self.exempted += 1;
            return;
        }

        let params: Vec<MessageParam> = params
            .into_iter()
            .filter(|(_, name)| name != "this")
            .enumerate()
            .filter_map(|(index, (pat, _))| self.param(index, pat))
            .collect();

        let body_span = body.span();
        let (line, col) = self.parsed.line_col(prop_lo);
        self.candidates.push(CandidateMessage {
            shape,
            property: prop_name(key),
            text,
            replace: self.parsed.offset(body_span.lo)..self.parsed.offset(body_span.hi),
            params,
            doc: resolved.doc,
            line,
            col,
        });
    }

    /// Byte range scanned for raw leading comments.
    ///
    /// Starts after the previous sibling (skipping the rest of its line, where
    /// its own trailing comment lives) or after the opening `{`, and ends at
    /// the function itself.
    fn raw_buffer(
        &self,
        prev_end: Option<BytePos>,
        object_lo: BytePos,
        prop_lo: BytePos,
        function_lo: BytePos,
    ) -> Range<usize> {
        let end = self.parsed.offset(function_lo.max(prop_lo));
        let start = match prev_end {
            Some(prev) => {
                let prev = self.parsed.offset(prev);
                self.source
                    .get(prev..end)
                    .and_then(|between| between.find('\n'))
                    .map_or(end, |newline| prev + newline + 1)
            }
            None => self.parsed.offset(object_lo) + 1,
        };
        start.min(end)..end
    }

    fn param(&self, index: usize, pat: &Pat) -> Option<MessageParam> {
        let Pat::Ident(binding) = pat else {
            return None;
        };
        let type_annotation = binding.type_ann.as_ref().and_then(|ann| {
            let span = ann.type_ann.span();
            self.source
                .get(self.parsed.offset(span.lo)..self.parsed.offset(span.hi))
                .map(str::to_string)
        });
        Some(MessageParam {
            index,
            name: binding.id.sym.to_string(),
            type_annotation,
        })
    }
}

impl Visit for MessageCollector<'_> {
    fn visit_object_lit(&mut self, node: &ObjectLit) {
        let mut prev_end = None;
        for prop in &node.props {
            if let PropOrSpread::Prop(prop) = prop {
                self.check_prop(prop, prev_end, node.span.lo);
            }
            prev_end = Some(prop.span().hi);
        }

        node.visit_children_with(self);
    }
}

/// Classify the function and find its returned expression.
///
/// Parameters come back paired with their binding name (empty for
/// destructuring patterns) so `this` parameters can be filtered out before
/// positions are numbered.
fn analyze<'n>(node: &FunctionNode<'n>) -> Option<(MessageShape, &'n Expr, Vec<(&'n Pat, String)>)> {
    match *node {
        FunctionNode::Arrow(arrow) => {
            if arrow.is_async || arrow.is_generator {
                return None;
            }
            let (shape, body) = match &*arrow.body {
                BlockStmtOrExpr::Expr(expr) => (MessageShape::ArrowExpr, &**expr),
                BlockStmtOrExpr::BlockStmt(block) => (MessageShape::ArrowBlock, sole_return(block)?),
            };
            Some((shape, body, arrow.params.iter().map(named_pat).collect()))
        }
        FunctionNode::Function(function, shape) => {
            if function.is_async || function.is_generator {
                return None;
            }
            let body = sole_return(function.body.as_ref()?)?;
            Some((
                shape,
                body,
                function.params.iter().map(|p| named_pat(&p.pat)).collect(),
            ))
        }
    }
}

fn named_pat(pat: &Pat) -> (&Pat, String) {
    let name = match pat {
        Pat::Ident(binding) => binding.id.sym.to_string(),
        _ => String::new(),
    };
    (pat, name)
}

/// The argument of the block's only statement, if that is `return <expr>;`.
fn sole_return(block: &BlockStmt) -> Option<&Expr> {
    match block.stmts.as_slice() {
        [Stmt::Return(ret)] => ret.arg.as_deref(),
        _ => None,
    }
}

fn prop_name(key: &PropName) -> String {
    match key {
        PropName::Ident(ident) => ident.sym.to_string(),
        PropName::Str(s) => s.value.as_str().unwrap_or_default().to_string(),
        PropName::Num(n) => n.value.to_string(),
        PropName::BigInt(b) => b.value.to_string(),
        PropName::Computed(_) => "[computed]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::source::parse_source;
    use pretty_assertions::assert_eq;

    fn collect(source: &str) -> (Vec<CandidateMessage>, usize) {
        let parsed = parse_source(source.to_string(), "messages.ts").unwrap();
        let mut collector = MessageCollector::new(&parsed, source);
        parsed.module.visit_with(&mut collector);
        (collector.candidates, collector.exempted)
    }

    fn texts(candidates: &[CandidateMessage]) -> Vec<&str> {
        candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_all_four_shapes() {
        let source = r#"
export const messages = {
  a: () => "A",
  b: () => { return "B"; },
  c: function () { return "C"; },
  d() { return "D"; },
};
"#;
        let (candidates, _) = collect(source);
        let shapes: Vec<MessageShape> = candidates.iter().map(|c| c.shape).collect();

        assert_eq!(texts(&candidates), vec!["A", "B", "C", "D"]);
        assert_eq!(
            shapes,
            vec![
                MessageShape::ArrowExpr,
                MessageShape::ArrowBlock,
                MessageShape::FunctionExpr,
                MessageShape::MethodShorthand,
            ]
        );
    }

    #[test]
    fn test_replace_range_covers_only_return_expression() {
        let source = r#"const m = { greeting: (): string => "Hello", bye() { return 'Bye'; } };"#;
        let (candidates, _) = collect(source);

        assert_eq!(&source[candidates[0].replace.clone()], r#""Hello""#);
        assert_eq!(&source[candidates[1].replace.clone()], "'Bye'");
    }

    #[test]
    fn test_non_static_bodies_are_skipped() {
        let source = r#"
const m = {
  dynamic: (name: string) => `Hi ${name}`,
  call: () => format("x"),
  twoStatements: () => { const x = 1; return "x"; },
  noReturn: () => { "x"; },
  notAFunction: "plain",
  later: async () => "Later",
  *gen() { return "Gen"; },
};
"#;
        let (candidates, _) = collect(source);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_parameters_keep_positions_and_drop_patterns() {
        let source = r#"
const m = {
  welcome: (name: string, { id }: User, count: number) => "Welcome",
  method(this: Window, who) { return "Hey"; },
};
"#;
        let (candidates, _) = collect(source);

        assert_eq!(
            candidates[0].params,
            vec![
                MessageParam {
                    index: 0,
                    name: "name".to_string(),
                    type_annotation: Some("string".to_string()),
                },
                MessageParam {
                    index: 2,
                    name: "count".to_string(),
                    type_annotation: Some("number".to_string()),
                },
            ]
        );
        assert_eq!(
            candidates[1].params,
            vec![MessageParam {
                index: 0,
                name: "who".to_string(),
                type_annotation: None,
            }]
        );
    }

    #[test]
    fn test_nested_objects_are_visited() {
        let source = r#"
const m = {
  settings: {
    title: () => "Settings",
    sections: [{ label: () => "General" }],
  },
};
"#;
        let (candidates, _) = collect(source);
        assert_eq!(texts(&candidates), vec!["Settings", "General"]);
    }

    #[test]
    fn test_structured_no_translate_on_property() {
        let source = r#"
const m = {
  /** @notranslate */
  debugInfo: (): string => "Debug: mounted",
  title: () => "Title",
};
"#;
        let (candidates, exempted) = collect(source);
        assert_eq!(texts(&candidates), vec!["Title"]);
        assert_eq!(exempted, 1);
    }

    #[test]
    fn test_no_translate_on_function_node() {
        let source = r#"
const m = {
  debugInfo: /** @notranslate */ () => "Debug",
};
"#;
        let (candidates, exempted) = collect(source);
        assert!(candidates.is_empty());
        assert_eq!(exempted, 1);
    }

    #[test]
    fn test_raw_fallback_no_translate_line_comment() {
        let source = r#"
const m = {
  first: () => "First",
  // @notranslate
  second: () => "Second",
};
"#;
        let (candidates, exempted) = collect(source);
        assert_eq!(texts(&candidates), vec!["First"]);
        assert_eq!(exempted, 1);
    }

    #[test]
    fn test_trailing_comment_of_previous_property_does_not_leak() {
        let source = r#"
const m = {
  first: () => "First", // @notranslate
  second: () => "Second",
};
"#;
        let (candidates, _) = collect(source);
        assert_eq!(texts(&candidates), vec!["First", "Second"]);
    }

    #[test]
    fn test_exempted_function_descendants_still_visited() {
        let source = r#"
const m = {
  /** @notranslate */
  build: () => ({ inner: () => "Inner" }),
  /** @notranslate */
  debug: () => "Debug",
};
"#;
        let (candidates, exempted) = collect(source);
        assert_eq!(texts(&candidates), vec!["Inner"]);
        assert_eq!(exempted, 1);
    }

    #[test]
    fn test_doc_and_position() {
        let source = "const m = {\n  /**\n   * Close button\n   * @context dialog\n   */\n  close: () => \"Close\",\n};";
        let (candidates, _) = collect(source);

        let close = &candidates[0];
        assert_eq!(close.property, "close");
        assert_eq!((close.line, close.col), (6, 3));
        let doc = close.doc.as_ref().unwrap();
        assert_eq!(doc.description, "Close button");
        assert_eq!(doc.context(), Some("dialog"));
    }

    #[test]
    fn test_transformed_output_is_not_matched_again() {
        let source = r#"const m = { greeting: (): string => i18next.t("185f8db322") };"#;
        let (candidates, _) = collect(source);
        assert!(candidates.is_empty());
    }
}
