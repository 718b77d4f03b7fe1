//! Fixed-shape square matrices indexed by roster position.

/// A `k×k` row-major matrix written symmetrically.
#[derive(Debug, Clone, PartialEq)]
pub struct PairMatrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> PairMatrix<T> {
    /// A `size×size` matrix filled with `value`.
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }
}

impl<T> PairMatrix<T> {
    /// Cell `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> &T {
        assert!(row < self.size && col < self.size, "matrix index out of bounds");
        &self.cells[row * self.size + col]
    }

    /// Mutable cell `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        assert!(row < self.size && col < self.size, "matrix index out of bounds");
        &mut self.cells[row * self.size + col]
    }

    /// Consume into nested rows.
    pub fn into_rows(self) -> Vec<Vec<T>> {
        let size = self.size;
        let mut rows = Vec::with_capacity(size);
        let mut cells = self.cells.into_iter();
        for _ in 0..size {
            rows.push(cells.by_ref().take(size).collect());
        }
        rows
    }

    /// Apply `f` to every cell.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PairMatrix<U> {
        PairMatrix {
            size: self.size,
            cells: self.cells.into_iter().map(f).collect(),
        }
    }

    /// Keep only the given rows/columns, in the given order.
    pub fn project(&self, positions: &[usize]) -> PairMatrix<T>
    where
        T: Clone,
    {
        let cells = positions
            .iter()
            .flat_map(|&r| positions.iter().map(move |&c| (r, c)))
            .map(|(r, c)| self.get(r, c).clone())
            .collect();
        PairMatrix {
            size: positions.len(),
            cells,
        }
    }
}

impl<T: Clone> PairMatrix<T> {
    /// Write `value` to both `(i, j)` and `(j, i)`.
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: T) {
        *self.get_mut(j, i) = value.clone();
        *self.get_mut(i, j) = value;
    }
}

impl<T: std::ops::AddAssign + Copy> PairMatrix<T> {
    /// Add `delta` to `(i, j)` and, when distinct, to `(j, i)`.
    pub fn add_symmetric(&mut self, i: usize, j: usize, delta: T) {
        *self.get_mut(i, j) += delta;
        if i != j {
            *self.get_mut(j, i) += delta;
        }
    }
}
