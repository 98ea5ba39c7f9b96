//! Stdout rendering shared by all subcommands.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::client::{SearchKind, SearchResult};

/// Pretty JSON (two-space indent) followed by a newline.
pub fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// `text` terminated by exactly one newline.
pub fn print_text<W: Write>(out: &mut W, text: &str) -> Result<()> {
    if text.ends_with('\n') {
        out.write_all(text.as_bytes())?;
    } else {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

pub fn no_results_message(kind: SearchKind) -> String {
    format!("No matching Wikidata {}s found.", kind.as_str())
}

/// One line per result as `id: label` plus description, or the bare ID when both
/// label and description are blank.
pub fn search_lines(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|item| {
            let label = item.label.trim();
            let description = item.description.trim();
            if label.is_empty() && description.is_empty() {
                item.id.clone()
            } else {
                format!("{}: {} — {}", item.id, label, description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
