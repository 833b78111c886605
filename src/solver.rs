//! Backtracking search for a sequence of moves that clears the board.
//!
//! The search mutates a single board in place: each candidate move is
//! applied, explored, and reverted through the board's history when its
//! subtree fails. The recursion is unrolled onto an explicit stack of
//! frames, one per explored state.
//!
//! Optional extras:
//! - a deadline, reported as [`SolveOutcome::TimedOut`]
//! - a cache of states already proven unsolvable (occupancy bitmasks in an
//!   `FxHashSet`); it skips repeated subtrees without changing which
//!   solution is found first

use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Board, Move, Step};
use crate::error::BoardError;
use crate::geometry::Coord;

/// Largest board the dead-end cache can key (one bit per initial tile).
const MAX_CACHED_TILES: usize = 128;

/// Search settings.
#[derive(Clone, Debug, Default)]
pub struct SolveOptions {
    /// Give up after this much wall-clock time.
    pub deadline: Option<Duration>,
    /// Remember states proven unsolvable and skip them when reached again.
    pub dead_end_cache: bool,
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Moves that clear the board, in play order. Empty if it was already clear.
    Solved(Vec<Step>),
    /// Every sequence of moves gets stuck.
    Unsolvable,
    /// The deadline passed before the search finished.
    TimedOut,
}

/// Counters collected during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States whose moves were generated.
    pub nodes: u64,
    /// Moves reverted after their subtree failed.
    pub backtracks: u64,
    /// States skipped because the cache knew them to be dead ends.
    pub pruned: u64,
}

#[derive(Clone, Debug)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// One explored state: its candidate moves and the next one to try.
struct Frame {
    candidates: Vec<Move>,
    next: usize,
}

impl Frame {
    fn new(candidates: Vec<Move>) -> Self {
        Self {
            candidates,
            next: 0,
        }
    }

    fn next_candidate(&mut self) -> Option<Move> {
        let candidate = self.candidates.get(self.next).copied()?;
        self.next += 1;
        Some(candidate)
    }
}

/// States known to be unsolvable, keyed by which initial tiles remain.
///
/// The remaining tiles determine the metal cursor too, so the mask alone
/// identifies a state.
struct DeadEnds {
    bits: FxHashMap<Coord, u32>,
    seen: FxHashSet<u128>,
}

impl DeadEnds {
    fn new(board: &Board) -> Option<Self> {
        if board.remaining() > MAX_CACHED_TILES {
            log::warn!(
                "{} tiles exceed the dead-end cache limit of {}, cache disabled",
                board.remaining(),
                MAX_CACHED_TILES
            );
            return None;
        }
        let bits = board
            .tiles()
            .map(|(coord, _)| coord)
            .zip(0..)
            .collect();
        Some(Self {
            bits,
            seen: FxHashSet::default(),
        })
    }

    fn key(&self, board: &Board) -> u128 {
        board.tiles().fold(0, |mask, (coord, _)| {
            self.bits.get(&coord).map_or(mask, |&bit| mask | 1 << bit)
        })
    }

    fn contains(&self, board: &Board) -> bool {
        self.seen.contains(&self.key(board))
    }

    fn insert(&mut self, board: &Board) {
        self.seen.insert(self.key(board));
    }
}

/// Searches for a solution with default options.
///
/// On success the board is left cleared; otherwise it is restored.
pub fn solve(board: &mut Board) -> Result<SolveOutcome, BoardError> {
    solve_with(board, &SolveOptions::default()).map(|report| report.outcome)
}

/// Searches for a solution.
///
/// Candidates are tried in [`Board::feasible_ops`] order and the first
/// complete solution wins. A solved board stays cleared; after
/// `Unsolvable` or `TimedOut` the board is back in its starting state.
pub fn solve_with(board: &mut Board, options: &SolveOptions) -> Result<SolveReport, BoardError> {
    let started = Instant::now();
    let deadline = options.deadline.map(|limit| started + limit);
    let base = board.history().len();
    let mut stats = SearchStats::default();
    let mut dead_ends = if options.dead_end_cache {
        DeadEnds::new(board)
    } else {
        None
    };

    log::debug!("searching a board of {} tiles", board.remaining());

    let outcome = if board.is_solved() {
        SolveOutcome::Solved(Vec::new())
    } else {
        stats.nodes = 1;
        let mut frames = vec![Frame::new(board.feasible_ops())];

        loop {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                rewind(board, base);
                break SolveOutcome::TimedOut;
            }

            let Some(frame) = frames.last_mut() else {
                break SolveOutcome::Unsolvable;
            };

            match frame.next_candidate() {
                Some(op) => {
                    board.apply_op(op)?;
                    if board.is_solved() {
                        break SolveOutcome::Solved(board.history()[base..].to_vec());
                    }
                    if dead_ends.as_ref().is_some_and(|cache| cache.contains(board)) {
                        stats.pruned += 1;
                        board.reverse_last_op();
                        continue;
                    }
                    stats.nodes += 1;
                    frames.push(Frame::new(board.feasible_ops()));
                }
                None => {
                    // every move from this state failed
                    frames.pop();
                    if let Some(cache) = dead_ends.as_mut() {
                        cache.insert(board);
                    }
                    if !frames.is_empty() {
                        stats.backtracks += 1;
                        board.reverse_last_op();
                    }
                }
            }
        }
    };

    let elapsed = started.elapsed();
    log::debug!(
        "explored {} states, {} backtracks, {} pruned in {:?}",
        stats.nodes,
        stats.backtracks,
        stats.pruned,
        elapsed
    );
    match &outcome {
        SolveOutcome::Solved(steps) => log::info!("solved in {} moves", steps.len()),
        SolveOutcome::Unsolvable => log::info!("board is unsolvable"),
        SolveOutcome::TimedOut => log::info!("search timed out after {:?}", elapsed),
    }

    Ok(SolveReport {
        outcome,
        stats,
        elapsed,
    })
}

/// Reverts moves until the history is back to `len` entries.
fn rewind(board: &mut Board, len: usize) {
    while board.history().len() > len {
        board.reverse_last_op();
    }
}

/// Replays `steps` on a copy of `board`.
///
/// Returns true if every step is a legal move removing the recorded
/// elements and the board ends empty.
pub fn verify_solution(board: &Board, steps: &[Step]) -> bool {
    let mut board = board.clone();
    for step in steps {
        if !board.feasible_ops().contains(&step.op) {
            log::debug!("illegal move {:?}", step.op);
            return false;
        }
        match board.apply_op(step.op) {
            Ok(applied) if applied.elements == step.elements => {}
            _ => return false,
        }
    }
    board.is_solved()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;
    use crate::notation::DEFAULT_ROWS;

    fn board_with(tiles: &[(Coord, Element)]) -> Board {
        let mut board = Board::new();
        for &(coord, element) in tiles {
            board.set_tile(coord, element).unwrap();
        }
        board
    }

    /// Fire, fire, life, fire, fire, death around an empty center.
    fn fire_ring() -> Board {
        let elements = [
            Element::Fire,
            Element::Fire,
            Element::Life,
            Element::Fire,
            Element::Fire,
            Element::Death,
        ];
        let tiles: Vec<(Coord, Element)> =
            Coord::new(5, 5).neighbors().zip(elements).collect();
        board_with(&tiles)
    }

    /// Lead through Gold plus five mercury, no two tiles adjacent.
    fn metal_ladder() -> Board {
        board_with(&[
            (Coord::from_row(0, 0), Element::Mercury),
            (Coord::from_row(0, 2), Element::Mercury),
            (Coord::from_row(0, 4), Element::Mercury),
            (Coord::from_row(2, 0), Element::Mercury),
            (Coord::from_row(2, 2), Element::Mercury),
            (Coord::from_row(6, 0), Element::Gold),
            (Coord::from_row(6, 2), Element::Silver),
            (Coord::from_row(6, 4), Element::Copper),
            (Coord::from_row(8, 0), Element::Iron),
            (Coord::from_row(8, 2), Element::Tin),
            (Coord::from_row(8, 4), Element::Lead),
        ])
    }

    fn expect_solved(outcome: SolveOutcome) -> Vec<Step> {
        match outcome {
            SolveOutcome::Solved(steps) => steps,
            other => panic!("expected a solution, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_board_needs_no_moves() {
        let mut board = Board::new();
        let report = solve_with(&mut board, &SolveOptions::default()).unwrap();
        assert_eq!(report.outcome, SolveOutcome::Solved(Vec::new()));
        assert_eq!(report.stats.nodes, 0);
    }

    #[test]
    fn test_stuck_board_is_unsolvable() {
        let mut board = board_with(&[(Coord::new(5, 5), Element::Fire)]);
        assert!(board.feasible_ops().is_empty());
        assert_eq!(solve(&mut board).unwrap(), SolveOutcome::Unsolvable);
        assert_eq!(board.remaining(), 1);
    }

    #[test]
    fn test_lone_lead_is_unsolvable() {
        let mut board = board_with(&[(Coord::new(5, 5), Element::Lead)]);
        assert_eq!(solve(&mut board).unwrap(), SolveOutcome::Unsolvable);
    }

    #[test]
    fn test_failed_search_restores_board() {
        let mut board = board_with(&[
            (Coord::from_row(0, 0), Element::Fire),
            (Coord::from_row(0, 4), Element::Fire),
            (Coord::from_row(4, 2), Element::Water),
        ]);
        let original = board.clone();

        let report = solve_with(&mut board, &SolveOptions::default()).unwrap();
        assert_eq!(report.outcome, SolveOutcome::Unsolvable);
        assert_eq!(report.stats.nodes, 2);
        assert_eq!(report.stats.backtracks, 1);
        assert_eq!(board, original);
    }

    #[test]
    fn test_fire_ring_clears_in_three_moves() {
        let mut board = fire_ring();
        let original = board.clone();
        let steps = expect_solved(solve(&mut board).unwrap());
        assert_eq!(steps.len(), 3);
        assert!(board.is_solved());
        assert!(verify_solution(&original, &steps));
    }

    #[test]
    fn test_fire_ring_solvable_after_any_first_move() {
        let original = fire_ring();
        for op in original.feasible_ops() {
            let mut board = original.clone();
            board.apply_op(op).unwrap();
            let steps = expect_solved(solve(&mut board).unwrap());
            assert_eq!(steps.len(), 2, "Opening {op:?} should leave two moves");
        }
    }

    #[test]
    fn test_metals_clear_in_rank_order() {
        let mut board = metal_ladder();
        let original = board.clone();
        let steps = expect_solved(solve(&mut board).unwrap());

        let metals: Vec<Element> = steps.iter().map(|step| step.elements.0).collect();
        assert_eq!(
            metals,
            vec![
                Element::Lead,
                Element::Tin,
                Element::Iron,
                Element::Copper,
                Element::Silver,
                Element::Gold
            ]
        );
        assert!(steps[..5]
            .iter()
            .all(|step| step.elements.1 == Element::Mercury));
        assert!(steps[5].op.is_single());
        assert!(board.is_solved());
        assert_eq!(board.current_metal(), Element::Gold);
        assert!(verify_solution(&original, &steps));
    }

    #[test]
    fn test_default_board_solution() {
        let mut board = Board::from_rows(DEFAULT_ROWS).unwrap();
        let original = board.clone();
        let report = solve_with(&mut board, &SolveOptions::default()).unwrap();

        let steps = expect_solved(report.outcome);
        assert_eq!(steps.len(), 28);
        assert_eq!(report.stats.nodes, 32);
        assert_eq!(report.stats.backtracks, 4);
        assert!(verify_solution(&original, &steps));
    }

    #[test]
    fn test_dead_end_cache_finds_same_solution() {
        let plain = solve(&mut Board::from_rows(DEFAULT_ROWS).unwrap()).unwrap();
        let options = SolveOptions {
            dead_end_cache: true,
            ..SolveOptions::default()
        };
        let cached = solve_with(&mut Board::from_rows(DEFAULT_ROWS).unwrap(), &options).unwrap();
        assert_eq!(cached.outcome, plain);
    }

    #[test]
    fn test_dead_end_cache_prunes_repeated_states() {
        // two fire pairs and a stray water: every order of the fire moves fails
        let mut board = board_with(&[
            (Coord::from_row(0, 0), Element::Fire),
            (Coord::from_row(0, 2), Element::Fire),
            (Coord::from_row(0, 4), Element::Fire),
            (Coord::from_row(2, 0), Element::Fire),
            (Coord::from_row(4, 2), Element::Water),
        ]);
        let original = board.clone();
        let options = SolveOptions {
            dead_end_cache: true,
            ..SolveOptions::default()
        };
        let cached = solve_with(&mut board, &options).unwrap();
        assert_eq!(cached.outcome, SolveOutcome::Unsolvable);
        assert!(cached.stats.pruned > 0);
        assert_eq!(board, original);

        let plain = solve_with(&mut board, &SolveOptions::default()).unwrap();
        assert_eq!(plain.outcome, SolveOutcome::Unsolvable);
        assert!(plain.stats.nodes > cached.stats.nodes);
    }

    #[test]
    fn test_expired_deadline_times_out_and_restores() {
        let mut board = Board::from_rows(DEFAULT_ROWS).unwrap();
        let original = board.clone();
        let options = SolveOptions {
            deadline: Some(Duration::ZERO),
            ..SolveOptions::default()
        };
        let report = solve_with(&mut board, &options).unwrap();
        assert_eq!(report.outcome, SolveOutcome::TimedOut);
        assert_eq!(board, original);
    }

    #[test]
    fn test_verify_rejects_reordered_solution() {
        let original = metal_ladder();
        let mut board = original.clone();
        let mut steps = expect_solved(solve(&mut board).unwrap());
        steps.swap(0, 1);
        assert!(!verify_solution(&original, &steps));
        assert!(!verify_solution(&original, &steps[..0]));
    }
}
