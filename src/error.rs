//! Error types for board construction, parsing and file I/O.
//!
//! Running out of moves is not an error; the solver reports it as
//! [`SolveOutcome::Unsolvable`](crate::solver::SolveOutcome::Unsolvable).

use std::path::PathBuf;

use thiserror::Error;

use crate::elements::Element;
use crate::geometry::Coord;

/// A broken precondition on a board mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("no tile at {0:?}")]
    Unoccupied(Coord),
    #[error("{coord:?} already holds {existing}")]
    Occupied { coord: Coord, existing: Element },
    #[error("void cannot be placed on the board (at {0:?})")]
    VoidTile(Coord),
    #[error("a {metal} tile is already on the board at {existing:?}")]
    DuplicateMetal { metal: Element, existing: Coord },
}

/// A malformed textual board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} should have {expected} tiles, found {found}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile symbol {symbol:?} at row {row}, offset {offset}")]
    UnknownSymbol {
        symbol: char,
        row: usize,
        offset: usize,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Failure reading a board file or writing a solution.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid board in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}
