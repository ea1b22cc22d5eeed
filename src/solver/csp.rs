//! Column-by-column search with constraint propagation.
//!
//! After each placement the candidate rows of every other column are pruned
//! by row and by both diagonals. A column whose domain runs dry simply has
//! nothing to try, which sends the search back one column.
//!
//! Known quirk, kept because the published trace depends on it: a column
//! iterates the domain it was handed when its loop began, and on backtrack
//! the domain is restored from a copy saved before propagation. Rows are
//! filtered by value only, so a stale row can survive in a domain; the
//! occupancy guard in `place_column` covers for it and produces the same
//! redundant trials the animation has always shown.

use super::{backtrack_message, SOLUTION_MESSAGE};
use crate::board::Board;
use crate::emitter::StepEmitter;
use futures::future::{BoxFuture, FutureExt};

/// `domain[col]` lists the rows still allowed for a queen in `col`, in the
/// order they will be tried.
pub type Domain = Vec<Vec<usize>>;

pub fn full_domain(n: usize) -> Domain {
    vec![(0..n).collect(); n]
}

/// Returns a copy of `domain` with every row attacked by a queen at
/// `(row, col)` removed from the other columns. `domain` is left untouched.
pub fn propagate(row: usize, col: usize, domain: &Domain) -> Domain {
    domain
        .iter()
        .enumerate()
        .map(|(k, rows)| {
            if k == col {
                return rows.clone();
            }
            let diff = k.abs_diff(col);
            rows.iter()
                .copied()
                .filter(|&r| r != row && r.abs_diff(row) != diff)
                .collect()
        })
        .collect()
}

/// Searches from an empty `n`x`n` board with every row allowed in every
/// column. `true` means a solution is left on the board and was published.
pub async fn solve(n: usize, emitter: &mut StepEmitter) -> bool {
    let mut board = Board::new(n);
    place_column(0, full_domain(n), &mut board, emitter).await
}

fn place_column<'a>(
    col: usize,
    mut domain: Domain,
    board: &'a mut Board,
    emitter: &'a mut StepEmitter,
) -> BoxFuture<'a, bool> {
    async move {
        if emitter.is_cancelled() {
            return false;
        }
        let n = board.size();
        if col == n {
            emitter.step(board, SOLUTION_MESSAGE).await;
            return true;
        }

        let candidates = domain[col].clone();
        for row in candidates {
            if emitter.is_cancelled() {
                return false;
            }
            if board.is_occupied(row, col) {
                continue;
            }

            board.place(row, col);
            let message = format!("Placing queen at Row {}, Column {}", row + 1, col + 1);
            if !emitter.step(board, message).await {
                return false;
            }

            let saved = domain.clone();
            let narrowed = propagate(row, col, &domain);
            if place_column(col + 1, narrowed, board, emitter).await {
                return true;
            }

            board.remove(row, col);
            if !emitter.step(board, backtrack_message(row, col)).await {
                return false;
            }
            domain = saved;
        }
        false
    }
    .boxed()
}
