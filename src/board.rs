//! Board state: tiles, per-element indices, the metal cursor and the undo log.
//!
//! The board is mutated in place during search. Every [`Board::apply_op`] is
//! recorded in the history so [`Board::reverse_last_op`] can restore the
//! exact previous state, which keeps the solver free of board copies.

use std::collections::BTreeSet;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::elements::{Element, CARDINALS, METAL_KINDS, NON_METAL_KINDS};
use crate::error::{BoardError, ParseError};
use crate::geometry::{Coord, ADJACENT};
use crate::notation;

/// Metals in the order they must be removed.
const METAL_ORDER: [Element; METAL_KINDS] = [
    Element::Lead,
    Element::Tin,
    Element::Iron,
    Element::Copper,
    Element::Silver,
    Element::Gold,
];

/// Consecutive empty neighbors needed for a tile to be playable.
const FREE_RUN: usize = 3;

/// A legal removal: two distinct tiles, or the Gold tile on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub first: Coord,
    pub second: Coord,
}

impl Move {
    pub const fn pair(first: Coord, second: Coord) -> Self {
        Self { first, second }
    }

    /// A tile removed alone (the Gold finishing move).
    pub const fn single(coord: Coord) -> Self {
        Self {
            first: coord,
            second: coord,
        }
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.first == self.second
    }
}

/// An applied move together with the elements it removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    pub op: Move,
    pub elements: (Element, Element),
}

impl Step {
    #[inline]
    fn removes_metal(&self) -> bool {
        self.elements.0.is_metal() || self.elements.1.is_metal()
    }
}

/// Where each element currently sits.
///
/// Non-metals may appear many times; a metal appears at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ElementIndex {
    /// Fire through Mercury, indexed by `rank - 1`.
    non_metals: [BTreeSet<Coord>; NON_METAL_KINDS],
    /// Lead through Gold, indexed by `rank - Lead`.
    metals: [Option<Coord>; METAL_KINDS],
}

impl ElementIndex {
    fn set(&self, element: Element) -> &BTreeSet<Coord> {
        &self.non_metals[element.rank() as usize - 1]
    }

    fn set_mut(&mut self, element: Element) -> &mut BTreeSet<Coord> {
        &mut self.non_metals[element.rank() as usize - 1]
    }

    fn metal(&self, metal: Element) -> Option<Coord> {
        self.metals[(metal.rank() - Element::Lead.rank()) as usize]
    }

    fn metal_mut(&mut self, metal: Element) -> &mut Option<Coord> {
        &mut self.metals[(metal.rank() - Element::Lead.rank()) as usize]
    }
}

/// The puzzle board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    tiles: FxHashMap<Coord, Element>,
    index: ElementIndex,
    /// Metal tiles removed so far; the cursor is derived from this.
    metals_removed: u8,
    history: Vec<Step>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the 11-row textual form. See [`notation::parse_rows`].
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ParseError> {
        notation::parse_rows(rows)
    }

    /// Places a tile on an empty coordinate.
    pub fn set_tile(&mut self, coord: Coord, element: Element) -> Result<(), BoardError> {
        if element == Element::Void {
            return Err(BoardError::VoidTile(coord));
        }
        if let Some(&existing) = self.tiles.get(&coord) {
            return Err(BoardError::Occupied { coord, existing });
        }
        if element.is_metal() {
            if let Some(existing) = self.index.metal(element) {
                return Err(BoardError::DuplicateMetal {
                    metal: element,
                    existing,
                });
            }
        }
        self.place(coord, element);
        Ok(())
    }

    /// Removes the tile at `coord` and returns its element.
    pub fn delete_tile(&mut self, coord: Coord) -> Result<Element, BoardError> {
        self.remove(coord).ok_or(BoardError::Unoccupied(coord))
    }

    fn place(&mut self, coord: Coord, element: Element) {
        if element.is_metal() {
            *self.index.metal_mut(element) = Some(coord);
        } else {
            self.index.set_mut(element).insert(coord);
        }
        self.tiles.insert(coord, element);
    }

    fn remove(&mut self, coord: Coord) -> Option<Element> {
        let element = self.tiles.remove(&coord)?;
        if element.is_metal() {
            *self.index.metal_mut(element) = None;
        } else {
            self.index.set_mut(element).remove(&coord);
        }
        Some(element)
    }

    #[inline]
    pub fn tile(&self, coord: Coord) -> Option<Element> {
        self.tiles.get(&coord).copied()
    }

    /// All tiles, in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, Element)> + '_ {
        self.tiles.iter().map(|(&coord, &element)| (coord, element))
    }

    /// The only metal that may currently be removed.
    pub fn current_metal(&self) -> Element {
        let step = (self.metals_removed as usize).min(METAL_KINDS - 1);
        METAL_ORDER[step]
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Returns true if the tile at `coord` can be played right now.
    ///
    /// A tile is playable when it has at least three consecutive empty
    /// neighbors and, for metals, when it is the current metal.
    pub fn is_active(&self, coord: Coord) -> bool {
        let Some(element) = self.tile(coord) else {
            return false;
        };
        if element.is_metal() && element != self.current_metal() {
            return false;
        }

        let mut free_run = 0;
        for &vector in &ADJACENT {
            if self.tiles.contains_key(&(coord + vector)) {
                free_run = 0;
            } else {
                free_run += 1;
                if free_run == FREE_RUN {
                    return true;
                }
            }
        }
        false
    }

    /// Every playable tile, sorted by coordinate.
    pub fn active_tiles(&self) -> Vec<Coord> {
        self.tiles
            .keys()
            .copied()
            .filter(|&coord| self.is_active(coord))
            .sorted()
            .collect()
    }

    fn active_of(&self, element: Element) -> Vec<Coord> {
        self.index
            .set(element)
            .iter()
            .copied()
            .filter(|&coord| self.is_active(coord))
            .collect()
    }

    /// Enumerates every legal move in a fixed order.
    ///
    /// Categories come in this order: salt pairs; for each cardinal element
    /// its own pairs then pairs with salt; life with death; mercury with the
    /// current metal; finally the lone Gold move.
    pub fn feasible_ops(&self) -> Vec<Move> {
        let salts = self.active_of(Element::Salt);
        let mut ops: Vec<Move> = salts
            .iter()
            .tuple_combinations::<(_, _)>()
            .map(|(&a, &b)| Move::pair(a, b))
            .collect();

        for element in CARDINALS {
            let active = self.active_of(element);
            ops.extend(
                active
                    .iter()
                    .tuple_combinations::<(_, _)>()
                    .map(|(&a, &b)| Move::pair(a, b)),
            );
            ops.extend(
                active
                    .iter()
                    .cartesian_product(&salts)
                    .map(|(&a, &b)| Move::pair(a, b)),
            );
        }

        let life = self.active_of(Element::Life);
        let death = self.active_of(Element::Death);
        ops.extend(
            life.iter()
                .cartesian_product(&death)
                .map(|(&a, &b)| Move::pair(a, b)),
        );

        let metal = self.current_metal();
        let metal_slot = self
            .index
            .metal(metal)
            .filter(|&coord| self.is_active(coord));
        if let Some(slot) = metal_slot {
            if metal == Element::Gold {
                ops.push(Move::single(slot));
            } else {
                let mercury = self.active_of(Element::Mercury);
                ops.extend(mercury.into_iter().map(|coord| Move::pair(slot, coord)));
            }
        }

        ops
    }

    /// Number of tiles on the board.
    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    /// Number of tiles of one element on the board.
    pub fn elem_count(&self, element: Element) -> usize {
        self.tiles.values().filter(|&&e| e == element).count()
    }

    /// Removes the tiles of `op` and records the step.
    ///
    /// Both coordinates are checked before anything changes, so an error
    /// leaves the board untouched.
    pub fn apply_op(&mut self, op: Move) -> Result<Step, BoardError> {
        let first = self.tile(op.first).ok_or(BoardError::Unoccupied(op.first))?;
        let second = self.tile(op.second).ok_or(BoardError::Unoccupied(op.second))?;
        let step = Step {
            op,
            elements: (first, second),
        };

        if step.removes_metal() {
            self.metals_removed += 1;
        }
        self.remove(op.first);
        if !op.is_single() {
            self.remove(op.second);
        }
        self.history.push(step);
        log::trace!("applied {:?}, {} tiles left", step, self.remaining());
        Ok(step)
    }

    /// Undoes the most recent move. Returns `None` when nothing was applied.
    pub fn reverse_last_op(&mut self) -> Option<Step> {
        let step = self.history.pop()?;
        if step.removes_metal() {
            self.metals_removed -= 1;
        }
        self.place(step.op.first, step.elements.0);
        if !step.op.is_single() {
            self.place(step.op.second, step.elements.1);
        }
        log::trace!("reverted {:?}", step);
        Some(step)
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.tiles.is_empty()
    }
}
