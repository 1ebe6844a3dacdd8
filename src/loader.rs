//! Program Loader - Parse Intcode program text
//!
//! A program is a single line of comma-separated signed decimal integers,
//! memory contents from address 0 upward. Surrounding whitespace and a
//! trailing comma are tolerated.
//!
//! # Usage
//!
//! ```ignore
//! use intcode::loader::{load_file, parse_program};
//!
//! let program = load_file("input.txt")?;
//! let tiny = parse_program("1,0,0,0,99")?;
//! ```

use std::path::Path;

use anyhow::Context;

use crate::error::{IntcodeError, Result};
use crate::vm::Word;

/// Parse comma-separated program text
pub fn parse_program(text: &str) -> Result<Vec<Word>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let text = text.strip_suffix(',').unwrap_or(text);

    text.split(',')
        .enumerate()
        .map(|(position, token)| {
            let token = token.trim();
            token.parse::<Word>().map_err(|_| IntcodeError::Parse {
                position,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Read and parse a program file
pub fn load_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Word>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let program =
        parse_program(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    log::debug!("loaded {} words from {}", program.len(), path.display());
    Ok(program)
}

/// Render words back into program text
pub fn format_program(words: &[Word]) -> String {
    words
        .iter()
        .map(Word::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_program() {
        assert_eq!(parse_program("1,0,0,0,99").unwrap(), vec![1, 0, 0, 0, 99]);
        assert_eq!(
            parse_program(" 109, -1,204 ,1,99\n").unwrap(),
            vec![109, -1, 204, 1, 99]
        );
        assert_eq!(parse_program("104,1125899906842624,99,").unwrap().len(), 3);
        assert!(parse_program("\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_program("1,2,x,4"),
            Err(IntcodeError::Parse {
                position: 2,
                token: "x".to_string()
            })
        );
        assert!(parse_program("1,,2").is_err());
        assert!(parse_program("99999999999999999999").is_err());
    }

    #[test]
    fn test_format_program() {
        let words = vec![1002, -4, 3, 4, 33];
        assert_eq!(format_program(&words), "1002,-4,3,4,33");
        assert_eq!(parse_program(&format_program(&words)).unwrap(), words);
    }

    #[test]
    fn test_load_file() {
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "3,0,4,0,99").unwrap();

        let program = load_file(file.path()).unwrap();
        assert_eq!(program, vec![3, 0, 4, 0, 99]);
    }

    #[test]
    fn test_load_file_errors() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = load_file(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));

        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "1,two,3").unwrap();
        let err = load_file(&bad).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
        assert!(err.downcast_ref::<IntcodeError>().is_some());
    }
}
