use crate::config::Config;
use crate::note::Note;

/// Render a note's output document: the converted body, followed by one
/// `@tag` line per tag when enabled.
pub fn note_to_text(note: &Note, config: &Config) -> String {
    let mut out = note.content.clone();
    if config.output.append_tags && !note.tags.is_empty() {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        for tag in &note.tags {
            out.push('@');
            out.push_str(tag);
            out.push('\n');
        }
    }
    out
}

/// Reduce a note title to a safe file-name stem. Path separators become
/// hyphens; an empty or all-whitespace title falls back to "untitled".
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}
