//! Textual board format and solution rendering.
//!
//! A board is written as 11 rows, top to bottom, one character per cell.
//! Row lengths follow the hexagon: 6, 7, ..., 11, ..., 7, 6. The symbol
//! table lives on [`Element::from_symbol`]; `o` marks an empty cell.

use std::fmt::Write;

use crate::board::{Board, Step};
use crate::elements::Element;
use crate::error::ParseError;
use crate::geometry::{row_len, Coord, RADIUS, ROWS};

/// Built-in example board.
pub const DEFAULT_ROWS: &[&str] = &[
    "teata4",
    "hhoooem",
    "aoaooeof",
    "eooaahooe",
    "vootoosoom",
    "efefo6ofm2v",
    "hoofooaooa",
    "vooftsoo1",
    "sovoofot",
    "tmooos5",
    "tfe3ht",
];

/// Line printed when no solution exists.
pub const UNSOLVABLE: &str = "Unsolvable board.";

/// Builds a board from its 11 textual rows.
pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board, ParseError> {
    if rows.len() != ROWS {
        return Err(ParseError::RowCount {
            expected: ROWS,
            found: rows.len(),
        });
    }

    let mut board = Board::new();
    for (row, line) in rows.iter().enumerate() {
        let line: &str = line.as_ref();
        let expected = row_len(row);
        let found = line.chars().count();
        if found != expected {
            return Err(ParseError::RowLength {
                row,
                expected,
                found,
            });
        }

        for (offset, symbol) in line.chars().enumerate() {
            let element = Element::from_symbol(symbol).ok_or(ParseError::UnknownSymbol {
                symbol,
                row,
                offset,
            })?;
            if element != Element::Void {
                board.set_tile(Coord::from_row(row, offset), element)?;
            }
        }
    }

    Ok(board)
}

/// Parses free-form text: surrounding whitespace is trimmed, blank lines
/// and lines starting with `#` are skipped.
pub fn parse_text(text: &str) -> Result<Board, ParseError> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    parse_rows(&rows)
}

/// Renders the board as labelled rows, indented to show the hexagon.
///
/// Empty cells print as `o`, so each row reads back through [`parse_rows`]
/// once the label and spaces are removed.
pub fn format_board(board: &Board) -> String {
    let mut output = String::new();
    for row in 0..ROWS {
        let indent = (RADIUS - row as i32).unsigned_abs() as usize;
        let cells: Vec<String> = (0..row_len(row))
            .map(|offset| {
                board
                    .tile(Coord::from_row(row, offset))
                    .unwrap_or(Element::Void)
                    .symbol()
                    .to_string()
            })
            .collect();
        let _ = writeln!(
            output,
            "row {row:>2}: {}{}",
            " ".repeat(indent),
            cells.join(" ")
        );
    }
    output
}

/// Renders one move as `(row, offset) element + (row, offset) element`.
pub fn format_step(step: &Step) -> String {
    let (first, second) = step.elements;
    format!(
        "{:?} {} + {:?} {}",
        step.op.first.to_row(),
        first,
        step.op.second.to_row(),
        second
    )
}

/// Renders a numbered move list.
pub fn format_solution(steps: &[Step]) -> String {
    let mut output = String::new();
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(output, "{}. {}", i + 1, format_step(step));
    }
    output
}
