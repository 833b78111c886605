//! Sigmar's Garden Solver Library
//!
//! Finds an order of tile removals that clears a Sigmar's Garden board:
//! a hexagon of 91 cells holding elemental tiles that are removed in
//! matching pairs, with metals unlocked one rank at a time.
//!
//! - `geometry`: axial coordinates and the board shape
//! - `elements`: tile kinds and pairing rules
//! - `board`: mutable board state with move generation and undo
//! - `solver`: depth-first backtracking search
//! - `notation`: textual boards and rendered solutions
//! - `persistence`: board files and saved solutions

pub mod board;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod notation;
pub mod persistence;
pub mod solver;

pub use board::{Board, Move, Step};
pub use elements::{can_combine, Element};
pub use error::{BoardError, ParseError, PersistenceError};
pub use geometry::Coord;
pub use solver::{solve, solve_with, SolveOptions, SolveOutcome, SolveReport};
