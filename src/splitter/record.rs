use std::fs;
use std::io;
use std::path::Path;

pub const DELIMITER: &str = "&^&^&^&^&^&^";
pub const BINARY_PLACEHOLDER: &str = "[BINARY FILE - CONTENT SKIPPED]\n";
pub const UNREADABLE_PLACEHOLDER: &str = "[UNREADABLE FILE - CONTENT SKIPPED]\n";

/// Body of one record, after the header line.
#[derive(Debug)]
pub enum FileContent {
    Text(String),
    Binary,
    Unreadable(io::Error),
}

impl FileContent {
    pub fn read(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => FileContent::Text(normalize_newlines(text)),
                Err(_) => FileContent::Binary,
            },
            Err(e) => FileContent::Unreadable(e),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileContent::Text(text) => text,
            FileContent::Binary => BINARY_PLACEHOLDER,
            FileContent::Unreadable(_) => UNREADABLE_PLACEHOLDER,
        }
    }
}

pub fn header(rel_path: &str) -> String {
    format!("\n\n{DELIMITER} {rel_path} {DELIMITER}\n")
}

/// Text-mode newline translation: `\r\n` and lone `\r` both become `\n`.
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_header_format() {
        assert_eq!(
            header("packages/backend/src/a.txt"),
            "\n\n&^&^&^&^&^&^ packages/backend/src/a.txt &^&^&^&^&^&^\n"
        );
    }

    #[test]
    fn test_reads_utf8_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "héllo\n").unwrap();

        let content = FileContent::read(&path);
        assert!(matches!(content, FileContent::Text(_)));
        assert_eq!(content.as_str(), "héllo\n");
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logo.png");
        fs::write(&path, [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe, 0x00]).unwrap();

        let content = FileContent::read(&path);
        assert!(matches!(content, FileContent::Binary));
        assert_eq!(content.as_str(), BINARY_PLACEHOLDER);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let content = FileContent::read(&dir.path().join("gone.txt"));
        assert!(matches!(content, FileContent::Unreadable(_)));
        assert_eq!(content.as_str(), UNREADABLE_PLACEHOLDER);
    }

    #[test]
    fn test_crlf_is_normalized() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n".to_string()), "a\nb\nc\n");
        assert_eq!(normalize_newlines("plain\n".to_string()), "plain\n");
    }
}
