use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use filetime::FileTime;
use tomboy2text::{Config, Note, file_stem, load_note, note_to_text};

#[derive(Parser)]
#[command(name = "tomboy2text")]
#[command(about = "Convert Tomboy note XML to markdown-ish plain text")]
struct Cli {
    /// Note files or directories containing .note files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory (prints to stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, default_value = "tomboy2text.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config);

    let notes = expand_inputs(&cli.inputs)?;
    if notes.is_empty() {
        anyhow::bail!("no .note files found in the provided inputs");
    }

    for (idx, path) in notes.iter().enumerate() {
        let note =
            load_note(path).with_context(|| format!("converting {}", path.display()))?;
        let text = note_to_text(&note, &config);
        match &cli.output {
            Some(dir) => {
                let out_path = write_output(dir, &note, &text, &config)
                    .with_context(|| format!("writing output for {}", path.display()))?;
                println!("{} -> {}", path.display(), out_path.display());
            }
            None => {
                if notes.len() > 1 {
                    if idx > 0 {
                        println!();
                    }
                    println!("== {} ==", path.display());
                }
                print!("{text}");
                if !text.ends_with('\n') {
                    println!();
                }
            }
        }
    }

    Ok(())
}

/// Expand files and directories into the sorted list of note files to
/// convert. Directories are scanned one level deep; Tomboy keeps all
/// its notes flat in a single directory.
fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        let meta = fs::metadata(path)
            .with_context(|| format!("reading metadata for {}", path.display()))?;
        if meta.is_dir() {
            let mut found = Vec::new();
            for entry in
                fs::read_dir(path).with_context(|| format!("scanning {}", path.display()))?
            {
                let entry = entry?;
                let entry_path = entry.path();
                if entry_path.is_file() && has_note_extension(&entry_path) {
                    found.push(entry_path);
                }
            }
            found.sort();
            out.extend(found);
        } else if has_note_extension(path) {
            out.push(path.clone());
        } else {
            anyhow::bail!("{} is not a .note file", path.display());
        }
    }
    Ok(out)
}

fn has_note_extension(path: &Path) -> bool {
    path.extension().map(|ext| ext == "note").unwrap_or(false)
}

/// Write one converted note under the output directory, using the
/// sanitized title as the file name and the notebook as a subdirectory
/// when configured.
fn write_output(dir: &Path, note: &Note, text: &str, config: &Config) -> Result<PathBuf> {
    let mut target = dir.to_path_buf();
    if config.output.notebook_dirs {
        if let Some(notebook) = &note.notebook {
            target.push(file_stem(notebook));
        }
    }
    fs::create_dir_all(&target).with_context(|| format!("creating {}", target.display()))?;

    let file_name = format!("{}.{}", file_stem(&note.title), config.output.extension);
    let out_path = target.join(file_name);
    fs::write(&out_path, text).with_context(|| format!("writing {}", out_path.display()))?;

    if config.output.preserve_mtime {
        if let Some(ts) = note.last_change {
            let mtime = FileTime::from_unix_time(ts.timestamp(), ts.timestamp_subsec_nanos());
            filetime::set_file_mtime(&out_path, mtime)
                .with_context(|| format!("setting mtime on {}", out_path.display()))?;
        }
    }
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_inputs_scans_directories_for_notes() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.note"), "x").unwrap();
        fs::write(tmp.path().join("a.note"), "x").unwrap();
        fs::write(tmp.path().join("skip.txt"), "x").unwrap();

        let expanded = expand_inputs(&[tmp.path().to_path_buf()]).unwrap();
        let names: Vec<_> = expanded
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.note", "b.note"]);
    }

    #[test]
    fn expand_inputs_rejects_other_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        let stray = tmp.path().join("stray.org");
        fs::write(&stray, "x").unwrap();
        assert!(expand_inputs(&[stray]).is_err());
    }

    #[test]
    fn write_output_places_notes_in_notebook_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let note = Note {
            title: "Weekly Sync".to_string(),
            notebook: Some("Work".to_string()),
            ..Note::default()
        };
        let out = write_output(tmp.path(), &note, "body\n", &Config::default()).unwrap();
        assert_eq!(out, tmp.path().join("Work").join("Weekly Sync.md"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "body\n");
    }

    #[test]
    fn write_output_preserves_last_change_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let ts = chrono::DateTime::parse_from_rfc3339("2020-05-01T12:00:00+00:00").unwrap();
        let note = Note {
            title: "Stamped".to_string(),
            last_change: Some(ts),
            ..Note::default()
        };
        let out = write_output(tmp.path(), &note, "x\n", &Config::default()).unwrap();
        let meta = fs::metadata(&out).unwrap();
        let mtime = FileTime::from_last_modification_time(&meta);
        assert_eq!(mtime.unix_seconds(), ts.timestamp());
    }
}
