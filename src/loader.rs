use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::LoadError;

pub const LOG_SUFFIX: &str = ".log";
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// A named piece of log text, ready for segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub title: String,
    pub content: String,
}

pub fn load_path(path: &Path) -> Result<Vec<LogSource>, LoadError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());

    // Reject before touching the file
    if !is_supported(&name) {
        return Err(LoadError::UnsupportedFile(name));
    }

    let bytes = fs::read(path)?;
    load_bytes(&name, &bytes)
}

pub fn load_bytes(name: &str, bytes: &[u8]) -> Result<Vec<LogSource>, LoadError> {
    if name.ends_with(LOG_SUFFIX) {
        Ok(vec![LogSource {
            title: name.to_string(),
            content: String::from_utf8_lossy(bytes).into_owned(),
        }])
    } else if name.ends_with(ARCHIVE_SUFFIX) {
        read_archive(bytes)
    } else {
        Err(LoadError::UnsupportedFile(name.to_string()))
    }
}

pub fn is_supported(name: &str) -> bool {
    name.ends_with(LOG_SUFFIX) || name.ends_with(ARCHIVE_SUFFIX)
}

/// Every `.log` entry in archive order. An archive without any is not an error.
fn read_archive(bytes: &[u8]) -> Result<Vec<LogSource>, LoadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut sources = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() || !file.name().ends_with(LOG_SUFFIX) {
            continue;
        }

        let title = file.name().to_string();
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;

        log::debug!("Extracted {} ({} bytes)", title, buf.len());
        sources.push(LogSource {
            title,
            content: String::from_utf8_lossy(&buf).into_owned(),
        });
    }

    if sources.is_empty() {
        log::warn!("Archive contains no {} files", LOG_SUFFIX);
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn plain_log_is_one_source() {
        let sources = load_bytes("app.log", b"2024-01-01 10:00:00.000 [I] Sync: x").unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "app.log");
        assert!(sources[0].content.contains("Sync: x"));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let sources = load_bytes("app.log", &[b'o', b'k', 0xff]).unwrap();
        assert_eq!(sources[0].content, "ok\u{fffd}");
    }

    #[test]
    fn archive_yields_only_log_entries_in_order() {
        let bytes = build_zip(&[
            ("logs/", ""),
            ("logs/b.log", "second"),
            ("readme.txt", "ignore me"),
            ("logs/a.log", "third"),
            ("first.log", "first?"),
        ]);
        let sources = load_bytes("bundle.zip", &bytes).unwrap();
        let titles: Vec<&str> = sources.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, vec!["logs/b.log", "logs/a.log", "first.log"]);
        assert_eq!(sources[1].content, "third");
    }

    #[test]
    fn archive_without_logs_is_empty() {
        let bytes = build_zip(&[("notes.txt", "hello")]);
        assert!(load_bytes("bundle.zip", &bytes).unwrap().is_empty());
    }

    #[test]
    fn corrupt_archive_is_an_archive_error() {
        let err = load_bytes("bundle.zip", b"definitely not a zip").unwrap_err();
        assert!(matches!(err, LoadError::Archive(_)));
    }

    #[test]
    fn other_suffixes_are_rejected() {
        let err = load_bytes("notes.txt", b"text").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFile(name) if name == "notes.txt"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.log");
        fs::write(&path, "line one\nline two").unwrap();

        let sources = load_path(&path).unwrap();
        assert_eq!(sources[0].title, "device.log");
        assert_eq!(sources[0].content, "line one\nline two");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(&dir.path().join("gone.log")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
