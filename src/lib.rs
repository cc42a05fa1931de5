mod config;
mod error;
mod handler;
mod loader;
mod note;
mod text;

pub use config::{Config, OutputConfig};
pub use error::ConvertError;
pub use handler::NoteHandler;
pub use loader::{load_note, parse_note};
pub use note::Note;
pub use text::{file_stem, note_to_text};

/// Convert note XML straight to output text using default config.
pub fn xml_to_text(xml: &str) -> Result<String, ConvertError> {
    xml_to_text_with_config(xml, &Config::default())
}

/// Convert note XML straight to output text with custom config.
pub fn xml_to_text_with_config(xml: &str, config: &Config) -> Result<String, ConvertError> {
    let note = parse_note(xml)?;
    Ok(note_to_text(&note, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_to_text_appends_tag_lines() {
        let text = xml_to_text(
            "<note><note-content>body\n</note-content><tag>system:todo</tag></note>",
        )
        .unwrap();
        assert_eq!(text, "body\n@todo\n");
    }

    #[test]
    fn xml_to_text_propagates_parse_errors() {
        assert!(xml_to_text("<note><unclosed></note>").is_err());
    }
}
