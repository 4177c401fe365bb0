//! The read-only module matrix consumed by the renderers, plus the finder-pattern masks.

/// Side length of a finder pattern ("eye") in modules.
pub const FINDER_SIZE: usize = 7;

/// A square grid of dark/light modules produced by a QR encoder.
///
/// The engine never asks for anything beyond these two queries.
pub trait ModuleMatrix {
    /// Side length of the matrix.
    fn module_count(&self) -> usize;

    /// Whether the module at `(row, col)` is dark. Only called with in-range coordinates.
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

impl<M: ModuleMatrix + ?Sized> ModuleMatrix for &M {
    fn module_count(&self) -> usize {
        (**self).module_count()
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        (**self).is_dark(row, col)
    }
}

/// Plain owned matrix, handy for callers that already hold a boolean grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMatrix {
    count: usize,
    cells: Vec<bool>,
}

impl BitMatrix {
    /// Matrix with every module set to `dark`.
    pub fn filled(count: usize, dark: bool) -> Self {
        Self {
            count,
            cells: vec![dark; count * count],
        }
    }

    /// Build from a predicate over `(row, col)`.
    pub fn from_fn(count: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(count * count);
        for row in 0..count {
            for col in 0..count {
                cells.push(f(row, col));
            }
        }
        Self { count, cells }
    }

    /// Parse rows of text where `#`, `1`, `X` or `x` mark dark modules.
    ///
    /// Returns `None` when the rows do not form a square.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let count = rows.len();
        let mut cells = Vec::with_capacity(count * count);
        for row in rows {
            let row = row.as_ref();
            if row.chars().count() != count {
                return None;
            }
            cells.extend(row.chars().map(|c| matches!(c, '#' | '1' | 'X' | 'x')));
        }
        Some(Self { count, cells })
    }

    /// Set a single module.
    pub fn set(&mut self, row: usize, col: usize, dark: bool) {
        if row < self.count && col < self.count {
            self.cells[row * self.count + col] = dark;
        }
    }
}

impl ModuleMatrix for BitMatrix {
    fn module_count(&self) -> usize {
        self.count
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.count && col < self.count && self.cells[row * self.count + col]
    }
}

/// Cell of the 7×7 outer frame mask (the ring of a finder pattern).
pub fn in_frame_mask(row: i64, col: i64) -> bool {
    let n = FINDER_SIZE as i64;
    (0..n).contains(&row)
        && (0..n).contains(&col)
        && (row == 0 || col == 0 || row == n - 1 || col == n - 1)
}

/// Cell of the concentric 3×3 ball mask inside a 7×7 finder pattern.
pub fn in_ball_mask(row: i64, col: i64) -> bool {
    (2..=4).contains(&row) && (2..=4).contains(&col)
}

/// Whether `(row, col)` belongs to one of the three finder patterns of a `count`-sized matrix.
///
/// The top-left, top-right and bottom-left 7×7 regions are checked against the frame and ball
/// masks; the light ring between them is not part of either.
pub fn is_finder_cell(row: usize, col: usize, count: usize) -> bool {
    let (r, c, n) = (row as i64, col as i64, count as i64);
    let off = n - FINDER_SIZE as i64;
    let hit = |r: i64, c: i64| in_frame_mask(r, c) || in_ball_mask(r, c);
    hit(r, c) || hit(r - off, c) || hit(r, c - off)
}

/// A matrix seen through an inclusion filter.
///
/// A cell is active when it is in range, dark, and accepted by the filter. Neighbor probes of
/// the renderers only ever see active cells.
pub struct FilteredMatrix<'a> {
    matrix: &'a dyn ModuleMatrix,
    filter: &'a dyn Fn(usize, usize) -> bool,
}

impl<'a> FilteredMatrix<'a> {
    /// Wrap `matrix` with `filter(row, col)`.
    pub fn new(matrix: &'a dyn ModuleMatrix, filter: &'a dyn Fn(usize, usize) -> bool) -> Self {
        Self { matrix, filter }
    }

    /// Side length of the underlying matrix.
    pub fn count(&self) -> usize {
        self.matrix.module_count()
    }

    /// Whether the (possibly out-of-range) cell is active.
    pub fn is_active(&self, row: i64, col: i64) -> bool {
        let n = self.count() as i64;
        if row < 0 || col < 0 || row >= n || col >= n {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        (self.filter)(row, col) && self.matrix.is_dark(row, col)
    }

    /// Neighbor probe for the cell at `(row, col)`; `dx` moves along columns, `dy` along rows.
    pub fn probe(&self, row: usize, col: usize) -> impl Fn(i32, i32) -> bool + '_ {
        move |dx, dy| self.is_active(row as i64 + i64::from(dy), col as i64 + i64::from(dx))
    }
}

#[cfg(test)]
#[path = "../tests/unit/matrix.rs"]
mod tests;
