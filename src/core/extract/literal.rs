//! Compile-time string folding for message bodies.

use swc_ecma_ast::{BinaryOp, Expr, Lit, Tpl};

/// Reduce an expression to the string it always evaluates to.
///
/// Accepted forms:
/// - string literal: `"Hello"`
/// - template literal without substitutions: `` `Hello` ``
/// - left-associative `+` chains over the two above: `"Hello, " + "world"`
///
/// Parentheses are looked through. Anything else (identifiers, calls,
/// templates with `${}`) returns `None`; that is the normal pass-through
/// for dynamic strings.
pub fn fold_string(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Paren(paren) => fold_string(&paren.expr),
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            let mut left = fold_string(&bin.left)?;
            left.push_str(&string_operand(&bin.right)?);
            Some(left)
        }
        other => string_operand(other),
    }
}

/// A single literal operand (right-hand side of a `+` chain).
fn string_operand(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        Expr::Tpl(tpl) => static_template(tpl),
        Expr::Paren(paren) => string_operand(&paren.expr),
        _ => None,
    }
}

fn static_template(tpl: &Tpl) -> Option<String> {
    if !tpl.exprs.is_empty() {
        return None;
    }
    tpl.quasis
        .first()
        .and_then(|q| q.cooked.as_ref())
        .and_then(|s| s.as_str().map(|s| s.to_string()))
}
