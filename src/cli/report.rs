//! Report formatting and printing utilities.
//!
//! Separate from core logic to allow lingo to be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::extract::ExtractSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the result of an extraction pass: failures on stderr, the summary
/// on stdout.
pub fn print_extract(summary: &ExtractSummary, verbose: bool) {
    print_failures_to(summary, &mut io::stderr().lock());
    print_extract_to(summary, verbose, &mut io::stdout().lock());
}

pub fn print_failures_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    for (file, error) in &summary.failures {
        let _ = writeln!(writer, "{}: {}", "error".bold().red(), file.bold());
        let _ = writeln!(writer, "  {} {}", "-->".blue(), error);
    }
}

pub fn print_extract_to<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    let headline = format!(
        "Extracted {} {} from {} of {} source {}",
        summary.unique_messages,
        plural(summary.unique_messages, "message", "messages"),
        summary.files_transformed,
        summary.files_scanned,
        plural(summary.files_scanned, "file", "files"),
    );

    if summary.failures.is_empty() {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), headline.green());
    } else {
        let _ = writeln!(
            writer,
            "{} {} ({} {} failed)",
            FAILURE_MARK.red(),
            headline,
            summary.failures.len(),
            plural(summary.failures.len(), "file", "files"),
        );
    }

    if summary.exempted_count > 0 {
        let _ = writeln!(
            writer,
            "  {} {} marked @notranslate",
            summary.exempted_count,
            plural(summary.exempted_count, "function", "functions"),
        );
    }

    for path in &summary.written {
        let _ = writeln!(writer, "  {} {}", "wrote".cyan(), path.display());
    }

    if verbose {
        let _ = writeln!(
            writer,
            "  {} {} call sites, {} unique strings ({} chars) interned",
            "stats:".dimmed(),
            summary.message_count,
            summary.pool.unique_strings,
            summary.pool.total_chars,
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
