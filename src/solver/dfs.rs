//! Row-by-row depth-first backtracking.

use super::{backtrack_message, SOLUTION_MESSAGE};
use crate::board::Board;
use crate::emitter::StepEmitter;
use futures::future::{BoxFuture, FutureExt};

/// Column of each row's queen; `None` for rows not yet assigned.
type QueenPositions = Vec<Option<usize>>;

/// True when no assigned row above `row` shares `col` or a diagonal with it.
pub fn is_safe(queens: &[Option<usize>], row: usize, col: usize) -> bool {
    queens[..row].iter().enumerate().all(|(i, q)| match *q {
        Some(c) => c != col && c.abs_diff(col) != i.abs_diff(row),
        None => true,
    })
}

/// Searches from an empty `n`x`n` board. `true` means a solution is left on
/// the board and was published.
pub async fn solve(n: usize, emitter: &mut StepEmitter) -> bool {
    let mut queens: QueenPositions = vec![None; n];
    let mut board = Board::new(n);
    place_row(0, &mut queens, &mut board, emitter).await
}

fn place_row<'a>(
    row: usize,
    queens: &'a mut QueenPositions,
    board: &'a mut Board,
    emitter: &'a mut StepEmitter,
) -> BoxFuture<'a, bool> {
    async move {
        if emitter.is_cancelled() {
            return false;
        }
        let n = board.size();
        if row == n {
            emitter.step(board, SOLUTION_MESSAGE).await;
            return true;
        }

        for col in 0..n {
            if emitter.is_cancelled() {
                return false;
            }
            if !is_safe(queens, row, col) {
                continue;
            }

            queens[row] = Some(col);
            board.place(row, col);
            let message = format!("Trying queen at Row {}, Column {}", row + 1, col + 1);
            if !emitter.step(board, message).await {
                return false;
            }

            if place_row(row + 1, queens, board, emitter).await {
                return true;
            }

            queens[row] = None;
            board.remove(row, col);
            if !emitter.step(board, backtrack_message(row, col)).await {
                return false;
            }
        }
        false
    }
    .boxed()
}
