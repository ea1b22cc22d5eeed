use serde::Serialize;

/// NxN placement grid. `cells[row][col]` is true when a queen sits there.
///
/// The board does no validation of its own; safety checks belong to the
/// solvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    n: usize,
    cells: Vec<Vec<bool>>,
}

impl Board {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![vec![false; n]; n],
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn place(&mut self, row: usize, col: usize) {
        self.cells[row][col] = true;
    }

    pub fn remove(&mut self, row: usize, col: usize) {
        self.cells[row][col] = false;
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Deep copy handed to the presentation layer.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }

    /// Occupied cells as `(row, col)`, row-major.
    pub fn queens(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, q)| **q)
                .map(move |(c, _)| (r, c))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.queens().next().is_none()
    }

    /// True when exactly `n` queens are placed and no two share a row,
    /// column or diagonal.
    pub fn is_solution(&self) -> bool {
        let queens: Vec<_> = self.queens().collect();
        if queens.len() != self.n {
            return false;
        }
        for (i, &(r1, c1)) in queens.iter().enumerate() {
            for &(r2, c2) in &queens[i + 1..] {
                if r1 == r2 || c1 == c2 || r1.abs_diff(r2) == c1.abs_diff(c2) {
                    return false;
                }
            }
        }
        true
    }
}
