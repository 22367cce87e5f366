//! Source Map v3 generation.
//!
//! Columns are counted in UTF-16 code units, as browsers and Node expect.
//! Only the single-source, name-less subset of the format is produced.

use serde::{Deserialize, Serialize};

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A Source Map v3 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapV3 {
    pub version: u8,
    pub file: String,
    pub sources: Vec<String>,
    pub sources_content: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMapV3 {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode `mappings` back into absolute segments, one vector per
    /// generated line. Returns `None` on malformed input.
    pub fn decode_mappings(&self) -> Option<Vec<Vec<Segment>>> {
        let mut lines = Vec::new();
        let (mut src_line, mut src_col) = (0i64, 0i64);

        for line in self.mappings.split(';') {
            let mut segments = Vec::new();
            let mut gen_col = 0i64;
            for raw in line.split(',').filter(|s| !s.is_empty()) {
                let fields = decode_vlq(raw)?;
                let [d_gen, _source, d_line, d_col] = fields.as_slice() else {
                    return None;
                };
                gen_col += d_gen;
                src_line += d_line;
                src_col += d_col;
                segments.push(Segment {
                    gen_col: u32::try_from(gen_col).ok()?,
                    src_line: u32::try_from(src_line).ok()?,
                    src_col: u32::try_from(src_col).ok()?,
                });
            }
            lines.push(segments);
        }
        Some(lines)
    }
}

/// One mapping from a generated column to an original position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub gen_col: u32,
    pub src_line: u32,
    pub src_col: u32,
}

/// A line/column cursor in UTF-16 units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn advance_char(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += c.len_utf16() as u32;
        }
    }

    pub fn advance(&mut self, text: &str) {
        text.chars().for_each(|c| self.advance_char(c));
    }
}

/// Accumulates segments line by line and encodes them.
#[derive(Debug, Default)]
pub struct MappingsBuilder {
    lines: Vec<Vec<Segment>>,
}

impl MappingsBuilder {
    pub fn add(&mut self, generated: Position, original: Position) {
        let line = generated.line as usize;
        if self.lines.len() <= line {
            self.lines.resize_with(line + 1, Vec::new);
        }
        self.lines[line].push(Segment {
            gen_col: generated.col,
            src_line: original.line,
            src_col: original.col,
        });
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        let (mut prev_line, mut prev_col) = (0i64, 0i64);

        for (i, segments) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            let mut prev_gen = 0i64;
            for (j, seg) in segments.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                encode_vlq(&mut out, i64::from(seg.gen_col) - prev_gen);
                encode_vlq(&mut out, 0);
                encode_vlq(&mut out, i64::from(seg.src_line) - prev_line);
                encode_vlq(&mut out, i64::from(seg.src_col) - prev_col);
                prev_gen = i64::from(seg.gen_col);
                prev_line = i64::from(seg.src_line);
                prev_col = i64::from(seg.src_col);
            }
        }
        out
    }

    pub fn build(&self, file: &str, source_content: &str) -> SourceMapV3 {
        SourceMapV3 {
            version: 3,
            file: file.to_string(),
            sources: vec![file.to_string()],
            sources_content: vec![source_content.to_string()],
            names: Vec::new(),
            mappings: self.encode(),
        }
    }
}

fn encode_vlq(out: &mut String, value: i64) {
    let mut rest = if value < 0 {
        ((-value as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (rest & 0b11111) as usize;
        rest >>= 5;
        if rest > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64_ALPHABET[digit] as char);
        if rest == 0 {
            break;
        }
    }
}

fn decode_vlq(segment: &str) -> Option<Vec<i64>> {
    let mut values = Vec::new();
    let (mut value, mut shift) = (0u64, 0u32);

    for byte in segment.bytes() {
        let digit = BASE64_ALPHABET.iter().position(|&b| b == byte)? as u64;
        value |= (digit & 0b11111) << shift;
        if digit & 0b100000 != 0 {
            shift += 5;
            continue;
        }
        let magnitude = (value >> 1) as i64;
        values.push(if value & 1 == 1 { -magnitude } else { magnitude });
        value = 0;
        shift = 0;
    }
    (shift == 0).then_some(values)
}
