//! Plain-text rendering for the pager.
//!
//! # Invariants
//! - Output is deterministic for the same input.
//! - Table columns are padded by character count, not byte length.

use crate::dictionary::WordData;
use crate::model::word::{Annotation, WordEntry};
use std::fmt::Write;

const WRAP_WIDTH: usize = 76;
const MAX_CELL_CHARS: usize = 60;

/// Renders a looked-up word for paged display.
pub fn render_word(data: &WordData) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", data.word);
    if let Some(pronunciation) = data.pronunciations.first() {
        let _ = write!(out, "  {pronunciation}");
    }
    out.push('\n');
    out.push_str(&"=".repeat(data.word.chars().count().max(1)));
    out.push_str("\n\n");

    for (index, definition) in data.definitions.iter().enumerate() {
        let label = match definition.part_of_speech.as_deref() {
            Some(part_of_speech) => format!("{}. ({part_of_speech}) ", index + 1),
            None => format!("{}. ", index + 1),
        };
        push_wrapped(&mut out, &label, &definition.text);
    }

    out
}

/// Renders the saved-words table with one extra annotation column.
pub fn render_word_table(entries: &[WordEntry], extra: &str) -> String {
    if entries.is_empty() {
        return "Your dictionary is empty. Add words with `lexico add <word>`.\n".to_string();
    }

    let headers = ["#".to_string(), "Word".to_string(), column_title(extra)];
    let rows: Vec<[String; 3]> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            [
                (index + 1).to_string(),
                entry.word.text.clone(),
                truncate(entry.decoration.as_deref().unwrap_or(""), MAX_CELL_CHARS),
            ]
        })
        .collect();

    let mut widths = headers.clone().map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers, &widths);
    let separator = widths.map(|width| "-".repeat(width));
    push_row(&mut out, &separator, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

/// Renders every stored annotation of one word.
pub fn render_annotations(word: &str, annotations: &[Annotation]) -> String {
    let mut out = format!("{word}\n{}\n\n", "=".repeat(word.chars().count().max(1)));
    if annotations.is_empty() {
        out.push_str("No information saved for this word.\n");
        return out;
    }
    for annotation in annotations {
        let label = format!("{}: ", column_title(&annotation.kind));
        push_wrapped(&mut out, &label, &annotation.text);
    }
    out
}

fn column_title(kind: &str) -> String {
    let spaced = kind.trim().replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn push_wrapped(out: &mut String, label: &str, text: &str) {
    let indent = " ".repeat(label.chars().count());
    let mut line = label.to_string();
    let mut line_len = line.chars().count();
    let mut line_has_words = false;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_has_words && line_len + 1 + word_len > WRAP_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line = indent.clone();
            line_len = indent.chars().count();
            line_has_words = false;
        }
        if line_has_words {
            line.push(' ');
            line_len += 1;
        }
        line.push_str(word);
        line_len += word_len;
        line_has_words = true;
    }

    out.push_str(line.trim_end());
    out.push_str("\n\n");
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value.chars().take(max_chars.saturating_sub(3)).collect::<String>();
    truncated.push_str("...");
    truncated
}
