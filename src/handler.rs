use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::ConvertError;
use crate::note::Note;

/// Inline formatting spans and the marker each wraps its text in.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Inline {
    Bold,
    Italic,
    Strike,
    Mono,
}

impl Inline {
    fn marker(self) -> &'static str {
        match self {
            Inline::Bold => "*",
            Inline::Italic => "_",
            Inline::Strike => "~~",
            Inline::Mono => "`",
        }
    }
}

/// Destination for text while inside a recognized element.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NoteField {
    Title,
    Content,
    LastChange,
    Tag,
}

/// Streaming handler that folds note XML events into a [`Note`].
///
/// Feed open, close, and text events in document order, then take the
/// result with [`NoteHandler::finish`]. Text must arrive pre-segmented:
/// every newline is its own one-character chunk, the way a SAX parser
/// delivers character data (the loader takes care of the splitting).
#[derive(Default)]
pub struct NoteHandler {
    note: Note,
    // Which recognized element we are inside, if any
    inside: Option<NoteField>,
    list_depth: usize,
    header_level: u8,
    // Open inline spans, outermost first
    formatting: Vec<Inline>,
    // Body text accumulated since the last newline
    line: String,
}

impl NoteHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element-open event, keyed by the qualified tag name.
    pub fn handle_open(&mut self, name: &str) {
        match name {
            "title" => self.inside = Some(NoteField::Title),
            "note-content" => self.inside = Some(NoteField::Content),
            "last-change-date" => self.inside = Some(NoteField::LastChange),
            "tag" => self.inside = Some(NoteField::Tag),
            _ => {}
        }
        if self.inside != Some(NoteField::Content) {
            return;
        }
        match name {
            "list" => self.list_depth += 1,
            // Bullets go straight to the body, bypassing the line buffer
            "list-item" => {
                self.note.content.push_str(&"*".repeat(self.list_depth));
                self.note.content.push(' ');
            }
            "bold" => self.formatting.push(Inline::Bold),
            "italic" => self.formatting.push(Inline::Italic),
            "strikethrough" => self.formatting.push(Inline::Strike),
            "monospace" => self.formatting.push(Inline::Mono),
            "size:huge" => self.header_level = 1,
            "size:large" => self.header_level = 2,
            _ => {}
        }
    }

    /// Element-close event; mirrors [`NoteHandler::handle_open`].
    pub fn handle_close(&mut self, name: &str) {
        if matches!(name, "title" | "note-content" | "last-change-date" | "tag") {
            self.inside = None;
        }
        if self.inside != Some(NoteField::Content) {
            return;
        }
        match name {
            "list" => self.list_depth = self.list_depth.saturating_sub(1),
            "bold" => self.remove_marker(Inline::Bold),
            "italic" => self.remove_marker(Inline::Italic),
            "strikethrough" => self.remove_marker(Inline::Strike),
            "monospace" => self.remove_marker(Inline::Mono),
            "size:huge" | "size:large" => self.header_level = 0,
            _ => {}
        }
    }

    /// Character-data event. Chunks must already be newline-segmented.
    pub fn handle_text(&mut self, text: &str) -> Result<(), ConvertError> {
        match self.inside {
            Some(NoteField::Content) => {
                if text == "\n" {
                    let line = std::mem::take(&mut self.line);
                    self.note.content.push_str(&self.format_line(&line));
                } else {
                    let wrapped = self.format_characters(text);
                    self.line.push_str(&wrapped);
                }
            }
            Some(NoteField::Title) => self.note.title.push_str(text),
            Some(NoteField::LastChange) => {
                self.note.last_change = Some(parse_timestamp(text)?);
            }
            Some(NoteField::Tag) => self.record_tag(text),
            None => {}
        }
        Ok(())
    }

    /// Consume the handler and return the assembled note. A body line
    /// still pending without a terminating newline is discarded.
    pub fn finish(self) -> Note {
        self.note
    }

    // Closes the most recently opened span of this kind. Valid note
    // markup never overlaps two spans of the same kind, so this is a
    // plain stack pop in practice.
    fn remove_marker(&mut self, kind: Inline) {
        if let Some(idx) = self.formatting.iter().rposition(|f| *f == kind) {
            self.formatting.remove(idx);
        }
    }

    /// Wrap a chunk in the currently open inline markers, outermost
    /// first. Whitespace-only chunks pass through bare.
    fn format_characters(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let mut out = String::new();
        for f in &self.formatting {
            out.push_str(f.marker());
        }
        out.push_str(text);
        for f in self.formatting.iter().rev() {
            out.push_str(f.marker());
        }
        out
    }

    // The header level is read here, at flush time, so a heading span
    // still open at the newline prefixes the whole line.
    fn format_line(&self, line: &str) -> String {
        let mut out = "#".repeat(self.header_level as usize);
        out.push_str(line);
        out.push('\n');
        out
    }

    fn record_tag(&mut self, value: &str) {
        let tag = value.strip_prefix("system:").unwrap_or(value);
        if let Some(notebook) = tag.strip_prefix("notebook:") {
            self.note.notebook = Some(notebook.to_string());
        } else {
            self.note.tags.push(tag.to_string());
        }
    }
}

/// Parse a last-change-date value. Accepts RFC 3339 (Tomboy's native
/// form, any fractional precision), the space-separated equivalent,
/// and an offset-less form taken as UTC. Surrounding whitespace is
/// ignored; hand-edited notes sometimes pad the value.
fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ConvertError> {
    let trimmed = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ts);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc().fixed_offset());
    }
    Err(ConvertError::Timestamp {
        value: value.to_string(),
    })
}
