//! Span-splicing code rewriter.
//!
//! Edits are recorded against byte ranges of the original text and applied
//! in one pass, so every byte outside an edited range (comments, whitespace,
//! type annotations) comes out untouched. The pass also produces a
//! character-resolution source map: each unchanged character maps to its
//! original position, and each replacement maps to the start of the span it
//! overwrote.
//!
//! ## Module Structure
//!
//! - `source_map`: Source Map v3 model and VLQ encoding

pub mod source_map;

use std::ops::Range;

use source_map::{MappingsBuilder, Position, SourceMapV3};

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// Collects non-overlapping edits over `original` and renders the result.
pub struct CodeRewriter<'a> {
    original: &'a str,
    edits: Vec<Edit>,
}

impl<'a> CodeRewriter<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            edits: Vec::new(),
        }
    }

    /// Replace the bytes in `range` with `text`.
    pub fn overwrite(&mut self, range: Range<usize>, text: impl Into<String>) {
        debug_assert!(range.end <= self.original.len());
        self.edits.push(Edit {
            range,
            text: text.into(),
        });
    }

    /// Insert `text` in front of the byte at `at`.
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.overwrite(at..at, text);
    }

    pub fn has_changes(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Apply all edits, returning the new text and its source map.
    pub fn finish(mut self, file: &str) -> (String, SourceMapV3) {
        // Insertions sort ahead of a replacement starting at the same byte.
        self.edits
            .sort_by_key(|edit| (edit.range.start, edit.range.end));

        let extra: usize = self.edits.iter().map(|e| e.text.len()).sum();
        let mut out = String::with_capacity(self.original.len() + extra);
        let mut mappings = MappingsBuilder::default();
        let mut generated = Position::default();
        let mut original = Position::default();
        let mut cursor = 0;

        for edit in &self.edits {
            debug_assert!(edit.range.start >= cursor, "overlapping edits");
            let start = edit.range.start.max(cursor);
            self.copy_unchanged(
                cursor..start,
                &mut out,
                &mut mappings,
                &mut generated,
                &mut original,
            );

            if !edit.range.is_empty() {
                mappings.add(generated, original);
            }
            out.push_str(&edit.text);
            generated.advance(&edit.text);

            let end = edit.range.end.max(start);
            original.advance(&self.original[start..end]);
            cursor = end;
        }

        self.copy_unchanged(
            cursor..self.original.len(),
            &mut out,
            &mut mappings,
            &mut generated,
            &mut original,
        );

        let map = mappings.build(file, self.original);
        (out, map)
    }

    fn copy_unchanged(
        &self,
        range: Range<usize>,
        out: &mut String,
        mappings: &mut MappingsBuilder,
        generated: &mut Position,
        original: &mut Position,
    ) {
        let text = &self.original[range];
        for c in text.chars() {
            if c != '\n' {
                mappings.add(*generated, *original);
            }
            generated.advance_char(c);
            original.advance_char(c);
        }
        out.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::source_map::Segment;
    use super::*;

    #[test]
    fn test_no_edits_is_identity() {
        let rewriter = CodeRewriter::new("const a = 1;\n");
        assert!(!rewriter.has_changes());
        let (code, _) = rewriter.finish("a.ts");
        assert_eq!(code, "const a = 1;\n");
    }

    #[test]
    fn test_overwrite_and_insert() {
        let source = "x = \"Hi\";\ny = 'Yo';";
        let mut rewriter = CodeRewriter::new(source);
        rewriter.overwrite(4..8, "t(\"a\")");
        rewriter.overwrite(14..18, "t(\"b\")");
        rewriter.insert(0, "import t from \"t\";\n");

        let (code, _) = rewriter.finish("a.ts");
        assert_eq!(code, "import t from \"t\";\nx = t(\"a\");\ny = t(\"b\");");
    }

    #[test]
    fn test_unchanged_characters_map_to_themselves() {
        let source = "a = \"Hi\"; // keep";
        let mut rewriter = CodeRewriter::new(source);
        rewriter.overwrite(4..8, "call()");
        let (code, map) = rewriter.finish("a.ts");
        assert_eq!(code, "a = call(); // keep");

        let lines = map.decode_mappings().unwrap();
        // `a`, ` `, `=`, ` ` then the replacement, then `;` onwards shifted by 2.
        assert_eq!(
            lines[0][4],
            Segment {
                gen_col: 4,
                src_line: 0,
                src_col: 4,
            }
        );
        assert_eq!(
            lines[0][5],
            Segment {
                gen_col: 10,
                src_line: 0,
                src_col: 8,
            }
        );
        assert_eq!(lines[0].len(), 4 + 1 + 9);
    }

    #[test]
    fn test_inserted_line_shifts_generated_lines() {
        let source = "x;\ny;";
        let mut rewriter = CodeRewriter::new(source);
        rewriter.insert(0, "import z from \"z\";\n");
        let (_, map) = rewriter.finish("a.ts");

        let lines = map.decode_mappings().unwrap();
        assert!(lines[0].is_empty());
        assert_eq!(
            lines[1][0],
            Segment {
                gen_col: 0,
                src_line: 0,
                src_col: 0,
            }
        );
        assert_eq!(
            lines[2][0],
            Segment {
                gen_col: 0,
                src_line: 1,
                src_col: 0,
            }
        );
    }

    #[test]
    fn test_multiline_replacement_tracks_original_lines() {
        let source = "f = (\"a\" +\n  \"b\");\ng;";
        let mut rewriter = CodeRewriter::new(source);
        rewriter.overwrite(4..source.find(';').unwrap(), "t()");
        let (code, map) = rewriter.finish("a.ts");
        assert_eq!(code, "f = t();\ng;");

        let lines = map.decode_mappings().unwrap();
        // `g` is on original line 2 and generated line 1.
        assert_eq!(
            lines[1][0],
            Segment {
                gen_col: 0,
                src_line: 2,
                src_col: 0,
            }
        );
    }
}
