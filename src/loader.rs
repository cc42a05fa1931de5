use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::ConvertError;
use crate::handler::NoteHandler;
use crate::note::Note;

/// Parse a note from an in-memory XML document.
pub fn parse_note(xml: &str) -> Result<Note, ConvertError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);
    read_note(reader)
}

/// Load and parse a note file.
pub fn load_note(path: &Path) -> Result<Note, ConvertError> {
    tracing::debug!("loading {}", path.display());
    let file = File::open(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    reader.config_mut().trim_text(false);
    read_note(reader)
}

fn read_note<R: BufRead>(mut reader: Reader<R>) -> Result<Note, ConvertError> {
    let mut handler = NoteHandler::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                handler.handle_open(&name);
            }
            Ok(Event::Empty(e)) => {
                // Self-closing tag: fire open then close
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                handler.handle_open(&name);
                handler.handle_close(&name);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                handler.handle_close(&name);
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| ConvertError::Malformed {
                    position: reader.buffer_position(),
                    source: err.into(),
                })?;
                feed_text(&mut handler, &text)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e);
                feed_text(&mut handler, &text)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(source) => {
                return Err(ConvertError::Malformed {
                    position: reader.error_position(),
                    source,
                });
            }
        }
        buf.clear();
    }
    Ok(handler.finish())
}

/// Split a text node into the chunks the handler expects: line endings
/// normalized to `\n`, every newline delivered alone, empty segments
/// skipped.
fn feed_text(handler: &mut NoteHandler, text: &str) -> Result<(), ConvertError> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut rest = text.as_str();
    while let Some(pos) = rest.find('\n') {
        if pos > 0 {
            handler.handle_text(&rest[..pos])?;
        }
        handler.handle_text("\n")?;
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        handler.handle_text(rest)?;
    }
    Ok(())
}
