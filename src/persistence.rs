//! Reading boards from disk and writing solutions back.
//!
//! Board files hold the 11 rows of the textual format, one per line.
//! Blank lines and lines starting with `#` are ignored.

use std::fs;
use std::path::Path;

use crate::board::Board;
use crate::error::PersistenceError;
use crate::notation;

/// Loads and parses a board file.
pub fn load_board(path: &Path) -> Result<Board, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    notation::parse_text(&text).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a rendered solution, replacing any existing file.
pub fn save_solution(path: &Path, text: &str) -> Result<(), PersistenceError> {
    fs::write(path, text).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
