//! ASCII plots of a single (U, column) cell.
//!
//! The grid has a fixed size and no axes so the output is byte-stable:
//! - `o` observed `(scale, energy)` points
//! - `-` the fitted cubic across the fit domain
//! - `E` the selected equilibrium
//!
//! Later marks overwrite earlier ones in that order, except that curve
//! segments only fill blank cells.

use crate::domain::FitResult;
use crate::models::predict;

const MIN_WIDTH: usize = 10;
const MIN_HEIGHT: usize = 5;
/// Fraction of the energy span added above and below.
const ENERGY_PAD: f64 = 0.05;

/// Render a plot of observed points with the cell's fitted curve.
pub fn render_cell_plot(points: &[(f64, f64)], cell: &FitResult, width: usize, height: usize) -> String {
    let scales = scale_span(points, cell).unwrap_or((0.95, 1.10));
    let curve = cell
        .fit
        .as_ref()
        .map(|fit| sample_cubic(&fit.coefficients, scales, width.max(2)));
    let marker = cell.equilibrium.map(|eq| (eq.scale, eq.value));

    let energies = energy_span(points, curve.as_deref(), marker).unwrap_or((0.0, 1.0));
    let mut canvas = Canvas::new(width, height, scales, pad(energies, ENERGY_PAD));

    if let Some(curve) = &curve {
        canvas.polyline(curve);
    }
    for &(s, e) in points {
        canvas.put(s, e, 'o');
    }
    if let Some((s, e)) = marker {
        canvas.put(s, e, 'E');
    }

    let (s_min, s_max) = canvas.scales;
    let (e_min, e_max) = canvas.energies;
    let mut out = format!(
        "Plot: U={:.1} {} | scale=[{s_min:.3}, {s_max:.3}] | E=[{e_min:.4}, {e_max:.4}]\n",
        cell.u,
        cell.column.label(),
    );
    canvas.write_rows(&mut out);
    out
}

/// Render a plot from a saved fit (curve and equilibrium only, no points).
pub fn render_cell_plot_fit_only(cell: &FitResult, width: usize, height: usize) -> String {
    render_cell_plot(&[], cell, width, height)
}

/// Character grid with a data-space to cell mapping. Row 0 is the top.
struct Canvas {
    cells: Vec<Vec<char>>,
    scales: (f64, f64),
    energies: (f64, f64),
}

impl Canvas {
    fn new(width: usize, height: usize, scales: (f64, f64), energies: (f64, f64)) -> Self {
        let width = width.max(MIN_WIDTH);
        let height = height.max(MIN_HEIGHT);
        Self {
            cells: vec![vec![' '; width]; height],
            scales,
            energies,
        }
    }

    fn width(&self) -> usize {
        self.cells[0].len()
    }

    fn height(&self) -> usize {
        self.cells.len()
    }

    /// `(column, row)` of a data point, clamped to the grid.
    fn locate(&self, s: f64, e: f64) -> (usize, usize) {
        let fx = unit(s, self.scales);
        let fy = unit(e, self.energies);
        let last_col = (self.width() - 1) as f64;
        let last_row = (self.height() - 1) as f64;
        ((fx * last_col).round() as usize, (last_row - fy * last_row).round() as usize)
    }

    fn put(&mut self, s: f64, e: f64, ch: char) {
        let (col, row) = self.locate(s, e);
        self.cells[row][col] = ch;
    }

    fn polyline(&mut self, curve: &[(f64, f64)]) {
        let Some((&(s0, e0), rest)) = curve.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let mut from = self.locate(s0, e0);
        self.cells[from.1][from.0] = '-';
        for &(s, e) in rest {
            let to = self.locate(s, e);
            self.segment(from, to, '-');
            from = to;
        }
    }

    /// Bresenham segment; only blank cells are filled.
    fn segment(&mut self, from: (usize, usize), to: (usize, usize), ch: char) {
        let (mut x, mut y) = (from.0 as isize, from.1 as isize);
        let (x1, y1) = (to.0 as isize, to.1 as isize);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let step_x = if x < x1 { 1 } else { -1 };
        let step_y = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let Some(cell) = self.cells.get_mut(y as usize).and_then(|r| r.get_mut(x as usize)) {
                if *cell == ' ' {
                    *cell = ch;
                }
            }
            if (x, y) == (x1, y1) {
                break;
            }
            let twice = 2 * err;
            if twice >= dy {
                err += dy;
                x += step_x;
            }
            if twice <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    fn write_rows(&self, out: &mut String) {
        for row in &self.cells {
            out.extend(row.iter());
            out.push('\n');
        }
    }
}

/// Position of `v` within `(lo, hi)` as a fraction in `[0, 1]`.
fn unit(v: f64, (lo, hi): (f64, f64)) -> f64 {
    ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// The fit's domain if there is one, else the span of the points.
fn scale_span(points: &[(f64, f64)], cell: &FitResult) -> Option<(f64, f64)> {
    if let Some((lo, hi)) = cell.fit.as_ref().map(|fit| fit.domain) {
        if lo.is_finite() && hi.is_finite() && hi > lo {
            return Some((lo, hi));
        }
    }
    bounds(points.iter().map(|&(s, _)| s))
}

fn energy_span(
    points: &[(f64, f64)],
    curve: Option<&[(f64, f64)]>,
    marker: Option<(f64, f64)>,
) -> Option<(f64, f64)> {
    let all = points.iter().chain(curve.unwrap_or_default()).chain(marker.as_ref());
    bounds(all.map(|&(_, e)| e))
}

/// `(min, max)` of finite-bounded values with a non-zero spread.
fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo.is_finite() && hi.is_finite() && hi > lo).then_some((lo, hi))
}

fn pad((lo, hi): (f64, f64), frac: f64) -> (f64, f64) {
    let margin = ((hi - lo).abs() * frac).max(1e-12);
    (lo - margin, hi + margin)
}

/// `n` evenly spaced samples of the cubic over `(lo, hi)`, endpoints included.
fn sample_cubic(coefficients: &[f64; 4], (lo, hi): (f64, f64), n: usize) -> Vec<(f64, f64)> {
    let last = (n.max(2) - 1) as f64;
    (0..n.max(2))
        .map(|i| {
            let s = lo + (i as f64 / last) * (hi - lo);
            (s, predict(coefficients, s))
        })
        .collect()
}
