//! Multi-index enumeration over an N-dimensional grid.

/// Iterator over all multi-indices of a grid in row-major order.
///
/// The first dimension varies slowest and the last fastest, like counting
/// with an odometer whose rightmost wheel turns every step. A grid with no
/// dimensions has exactly one (empty) index; a grid with any zero-sized
/// dimension has none.
#[derive(Debug, Clone)]
pub struct GridIndices {
    shape: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl GridIndices {
    pub fn new(shape: Vec<usize>) -> Self {
        let done = shape.contains(&0);
        Self {
            current: vec![0; shape.len()],
            shape,
            done,
        }
    }

    /// Total number of indices the iterator yields
    #[must_use]
    pub fn total(&self) -> usize {
        self.shape.iter().product()
    }
}

impl Iterator for GridIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current.clone();

        // Increment indices (row-major: last dimension varies fastest)
        self.done = true;
        for i in (0..self.shape.len()).rev() {
            self.current[i] += 1;
            if self.current[i] < self.shape[i] {
                self.done = false;
                break;
            }
            self.current[i] = 0;
        }

        Some(result)
    }
}

/// Flat position of `indices` within a row-major grid of `shape`.
#[must_use]
pub fn flat_index(shape: &[usize], indices: &[usize]) -> Option<usize> {
    if indices.len() != shape.len() {
        return None;
    }
    let mut flat = 0;
    for (&idx, &size) in indices.iter().zip(shape) {
        if idx >= size {
            return None;
        }
        flat = flat * size + idx;
    }
    Some(flat)
}
