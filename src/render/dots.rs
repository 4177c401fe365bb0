//! Dot styles: which library shape each active cell becomes, and at which rotation.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::layout::grid::GridLayout;
use crate::matrix::{BitMatrix, FilteredMatrix, ModuleMatrix};
use crate::shapes::ShapeDescriptor;
use crate::shapes::dot::{
    CellGeometry, corner_extra_rounded, corner_rounded, corners_rounded, dot, side_rounded,
    square, zebra_bar, zebra_cap, zebra_dot,
};

/// Styling of data modules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotStyle {
    /// Plain squares.
    #[default]
    Square,
    /// Circles.
    Dots,
    /// Rounded ends where runs stop.
    Rounded,
    /// Like `Rounded` with quarter-disc corners.
    ExtraRounded,
    /// Diagonal leaf shapes.
    Classy,
    /// `Classy` with quarter-disc corners.
    ClassyRounded,
    /// Horizontal stripes with rounded ends.
    CircleZebra,
    /// Vertical stripes with rounded ends.
    CircleZebraVertical,
}

/// Neighbor probe: `(dx, dy)` relative to the current cell, `true` if that cell is active.
pub type Probe<'a> = &'a dyn Fn(i32, i32) -> bool;

/// Shape emitter for one style.
pub type DotEmitter = fn(CellGeometry, Probe<'_>) -> ShapeDescriptor;

impl DotStyle {
    /// Every style, in declaration order.
    pub const ALL: [DotStyle; 8] = [
        Self::Square,
        Self::Dots,
        Self::Rounded,
        Self::ExtraRounded,
        Self::Classy,
        Self::ClassyRounded,
        Self::CircleZebra,
        Self::CircleZebraVertical,
    ];

    /// The emitter for this style. Resolved once per pass, not per cell.
    pub fn emitter(self) -> DotEmitter {
        match self {
            Self::Square => emit_square,
            Self::Dots => emit_dot,
            Self::Rounded => emit_rounded,
            Self::ExtraRounded => emit_extra_rounded,
            Self::Classy => emit_classy,
            Self::ClassyRounded => emit_classy_rounded,
            Self::CircleZebra => emit_zebra_horizontal,
            Self::CircleZebraVertical => emit_zebra_vertical,
        }
    }

    /// Whether the emitted shape depends on the neighbors.
    pub fn uses_neighbors(self) -> bool {
        !matches!(self, Self::Square | Self::Dots)
    }
}

/// Active state of the four orthogonal neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Cell at column - 1.
    pub left: bool,
    /// Cell at column + 1.
    pub right: bool,
    /// Cell at row - 1.
    pub top: bool,
    /// Cell at row + 1.
    pub bottom: bool,
}

impl Neighbors {
    /// Sample all four neighbors through `probe(dx, dy)`.
    pub fn read(probe: Probe<'_>) -> Self {
        Self {
            left: probe(-1, 0),
            right: probe(1, 0),
            top: probe(0, -1),
            bottom: probe(0, 1),
        }
    }

    /// Number of active neighbors.
    pub fn count(self) -> usize {
        [self.left, self.right, self.top, self.bottom]
            .into_iter()
            .filter(|&n| n)
            .count()
    }
}

fn emit_square(cell: CellGeometry, _probe: Probe<'_>) -> ShapeDescriptor {
    square(cell, 0.0)
}

fn emit_dot(cell: CellGeometry, _probe: Probe<'_>) -> ShapeDescriptor {
    dot(cell, 0.0)
}

type CornerShape = fn(CellGeometry, f64) -> ShapeDescriptor;

fn emit_run_rounded(cell: CellGeometry, probe: Probe<'_>, corner: CornerShape) -> ShapeDescriptor {
    let n = Neighbors::read(probe);
    match n.count() {
        0 => dot(cell, 0.0),
        c if c > 2 || (n.left && n.right) || (n.top && n.bottom) => square(cell, 0.0),
        2 => {
            let rotation = if n.left && n.top {
                FRAC_PI_2
            } else if n.top && n.right {
                PI
            } else if n.right && n.bottom {
                -FRAC_PI_2
            } else {
                0.0
            };
            corner(cell, rotation)
        }
        _ => {
            let rotation = if n.top {
                FRAC_PI_2
            } else if n.right {
                PI
            } else if n.bottom {
                -FRAC_PI_2
            } else {
                0.0
            };
            side_rounded(cell, rotation)
        }
    }
}

fn emit_rounded(cell: CellGeometry, probe: Probe<'_>) -> ShapeDescriptor {
    emit_run_rounded(cell, probe, corner_rounded)
}

fn emit_extra_rounded(cell: CellGeometry, probe: Probe<'_>) -> ShapeDescriptor {
    emit_run_rounded(cell, probe, corner_extra_rounded)
}

fn emit_leaf(cell: CellGeometry, probe: Probe<'_>, corner: CornerShape) -> ShapeDescriptor {
    let n = Neighbors::read(probe);
    if n.count() == 0 {
        return corners_rounded(cell, FRAC_PI_2);
    }
    if !n.left && !n.top {
        return corner(cell, -FRAC_PI_2);
    }
    if !n.right && !n.bottom {
        return corner(cell, FRAC_PI_2);
    }
    square(cell, 0.0)
}

fn emit_classy(cell: CellGeometry, probe: Probe<'_>) -> ShapeDescriptor {
    emit_leaf(cell, probe, corner_rounded)
}

fn emit_classy_rounded(cell: CellGeometry, probe: Probe<'_>) -> ShapeDescriptor {
    emit_leaf(cell, probe, corner_extra_rounded)
}

/// `open_end` is the rotation of a cap whose only neighbor comes before it on the axis.
fn emit_zebra(cell: CellGeometry, before: bool, after: bool, open_end: f64) -> ShapeDescriptor {
    match (before, after) {
        (false, false) => zebra_dot(cell, 0.0),
        (true, false) => zebra_cap(cell, open_end),
        (false, true) => zebra_cap(cell, if open_end == 0.0 { PI } else { -open_end }),
        (true, true) => zebra_bar(cell, open_end),
    }
}

fn emit_zebra_horizontal(cell: CellGeometry, probe: Probe<'_>) -> ShapeDescriptor {
    let n = Neighbors::read(probe);
    emit_zebra(cell, n.left, n.right, 0.0)
}

fn emit_zebra_vertical(cell: CellGeometry, probe: Probe<'_>) -> ShapeDescriptor {
    let n = Neighbors::read(probe);
    emit_zebra(cell, n.top, n.bottom, FRAC_PI_2)
}

/// Emits shapes for a style over a grid.
#[derive(Clone, Copy)]
pub struct DotRenderer {
    style: DotStyle,
    emitter: DotEmitter,
}

impl std::fmt::Debug for DotRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotRenderer")
            .field("style", &self.style)
            .finish()
    }
}

impl DotRenderer {
    /// Renderer for `style`.
    pub fn new(style: DotStyle) -> Self {
        Self {
            style,
            emitter: style.emitter(),
        }
    }

    /// Style this renderer emits.
    pub fn style(&self) -> DotStyle {
        self.style
    }

    /// Shape for one cell.
    pub fn shape_at(&self, cell: CellGeometry, probe: Probe<'_>) -> ShapeDescriptor {
        (self.emitter)(cell, probe)
    }

    /// Shapes for every active cell of `matrix`, row-major.
    pub fn shapes(&self, matrix: &FilteredMatrix<'_>, layout: &GridLayout) -> Vec<ShapeDescriptor> {
        let count = matrix.count();
        let mut out = Vec::new();
        for row in 0..count {
            for col in 0..count {
                if !matrix.is_active(row as i64, col as i64) {
                    continue;
                }
                let origin = layout.cell_origin(row, col);
                let probe = matrix.probe(row, col);
                out.push(self.shape_at(
                    CellGeometry::new(origin.x, origin.y, layout.dot_size),
                    &probe,
                ));
            }
        }
        out
    }

    /// Decorative dots filling the disc around a circle-shaped code.
    ///
    /// The matrix is padded to a larger fake grid covering the inscribed circle. Fake cells
    /// inside the matrix footprint (plus one module of separation) stay empty, cells outside the
    /// circle stay empty, and the rest mirror the matrix's own cells so the ring's texture
    /// matches the code. Shapes are emitted column-major, like the padding is indexed.
    pub fn ring_shapes(
        &self,
        matrix: &dyn ModuleMatrix,
        layout: &GridLayout,
    ) -> Vec<ShapeDescriptor> {
        let count = layout.count as i64;
        let extra =
            ((layout.min_size / layout.dot_size - layout.count as f64) / 2.0).floor() as i64;
        if extra <= 0 {
            return Vec::new();
        }
        let fake = count + 2 * extra;
        let center = fake / 2;

        let source = |k: i64| -> Option<usize> {
            let k = if k - 2 * extra < 0 {
                k
            } else if k >= count {
                k - 2 * extra
            } else {
                k - extra
            };
            (0..count).contains(&k).then_some(k as usize)
        };
        let padded = BitMatrix::from_fn(fake as usize, |row, col| {
            let (i, j) = (col as i64, row as i64);
            let footprint = extra - 1..=fake - extra;
            if footprint.contains(&i) && footprint.contains(&j) {
                return false;
            }
            let (di, dj) = ((i - center) as f64, (j - center) as f64);
            if (di * di + dj * dj).sqrt() > center as f64 {
                return false;
            }
            match (source(j), source(i)) {
                (Some(r), Some(c)) => matrix.is_dark(r, c),
                _ => false,
            }
        });

        let accept_all = |_: usize, _: usize| true;
        let filtered = FilteredMatrix::new(&padded, &accept_all);
        let mut out = Vec::new();
        let x0 = layout.x0 - extra as f64 * layout.dot_size;
        let y0 = layout.y0 - extra as f64 * layout.dot_size;
        for col in 0..fake as usize {
            for row in 0..fake as usize {
                if !filtered.is_active(row as i64, col as i64) {
                    continue;
                }
                let probe = filtered.probe(row, col);
                out.push(self.shape_at(
                    CellGeometry::new(
                        x0 + col as f64 * layout.dot_size,
                        y0 + row as f64 * layout.dot_size,
                        layout.dot_size,
                    ),
                    &probe,
                ));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/dots.rs"]
mod tests;
