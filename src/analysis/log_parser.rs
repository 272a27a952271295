//! Line parsing for newline-delimited JSON benchmark logs.
//!
//! Lines that do not decode as JSON (blank lines, plain-text preambles,
//! truncated writes, binary noise) are dropped. A file with no valid line
//! yields an empty sequence, never an error. Input is read as bytes and
//! decoded lossily, so a stray non-UTF-8 byte only spoils its own line.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::types::LogRecord;

/// Decode every line of `data` that is valid JSON, in input order
pub fn parse_lines(data: &str) -> Vec<LogRecord> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for line in data.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LogRecord>(line) {
            Ok(record) => records.push(record),
            Err(_) => dropped += 1,
        }
    }

    log::debug!("Decoded {} records, dropped {} lines", records.len(), dropped);
    records
}

/// Decode raw input as text, replacing invalid UTF-8 sequences
pub fn decode_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Read and parse a log file
pub fn parse_log_file(path: &Path) -> Result<Vec<LogRecord>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read log file: {}", path.display()))?;
    Ok(parse_lines(&decode_bytes(&bytes)))
}

/// Read all of stdin as text
pub fn read_stdin() -> Result<String> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read from stdin")?;
    Ok(decode_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_drops_invalid_lines_in_order() {
        let data = "starting run\n{\"a\":1}\n\nnot { json\n{\"b\":2}\n[1,2]\n";
        let records = parse_lines(data);
        assert_eq!(records, vec![json!({"a": 1}), json!({"b": 2}), json!([1, 2])]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_lines("").is_empty());
        assert!(parse_lines("\n\n\n").is_empty());
        assert!(parse_lines("foo\nbar baz\n{{}").is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let records = parse_lines("{\"a\":1}\r\n{\"a\":2}\r\n");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_non_utf8_line_is_dropped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"a\":1}\n\xff\xfe garbage\n{\"b\":2}\n").unwrap();

        let records = parse_log_file(file.path()).unwrap();
        assert_eq!(records, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_all_binary_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0x00, 0xc3, b'\n', 0x80, 0x81]).unwrap();
        assert!(parse_log_file(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_missing_file_fails() {
        let err = parse_log_file(Path::new("/nonexistent/run.out")).unwrap_err();
        assert!(format!("{:?}", err).contains("/nonexistent/run.out"));
    }
}
