//! Renderer — the deterministic rasterizer.
//!
//! Takes a `FrameView` (pose, surface size, obstacles) and produces a grid of
//! terminal cells. Pure and stateless apart from its projection: the same view
//! always produces the same grid. It knows nothing about commands, ticks or
//! whether playback is running.

use crate::types::{Cell, CellChange, FrameView, NamedColor, Obstacle, Pose, Style};

/// Glyphs for the robot, one per 45° sector starting at +x and turning
/// towards +y (screen down).
const HEADING_GLYPHS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];

const GRID_STYLE: Style = Style::fg(NamedColor::DarkGrey).dim();
const OBSTACLE_STYLE: Style = Style::fg(NamedColor::White).dim();
const ROBOT_STYLE: Style = Style::fg(NamedColor::Green).bold();

/// Mapping from world units to terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// World units covered by one column. A row covers twice as much, since
    /// terminal cells are about twice as tall as they are wide.
    pub units_per_column: f64,
    /// World units between grid lines.
    pub grid_spacing: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Projection {
            units_per_column: 10.0,
            grid_spacing: 40.0,
        }
    }
}

impl Projection {
    pub fn units_per_row(&self) -> f64 {
        self.units_per_column * 2.0
    }

    /// Cell containing a world point, if it is not left of or above the origin.
    pub fn to_cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let cx = (x / self.units_per_column).floor();
        let cy = (y / self.units_per_row()).floor();
        if cx < 0.0 || cy < 0.0 || cx > f64::from(u16::MAX) || cy > f64::from(u16::MAX) {
            return None;
        }
        Some((cx as u16, cy as u16))
    }

    /// World point at the centre of a cell.
    fn cell_center(&self, cx: u16, cy: u16) -> (f64, f64) {
        (
            (f64::from(cx) + 0.5) * self.units_per_column,
            (f64::from(cy) + 0.5) * self.units_per_row(),
        )
    }

    /// Whether a grid line at a multiple of `grid_spacing` falls in the
    /// world span `[start, start + width)`.
    fn has_line(&self, start: f64, width: f64) -> bool {
        if self.grid_spacing <= 0.0 {
            return false;
        }
        let k = (start / self.grid_spacing).ceil();
        k * self.grid_spacing < start + width
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    projection: Projection,
}

impl Renderer {
    pub fn new(projection: Projection) -> Self {
        Renderer { projection }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Rasterize one frame. A zero-sized surface yields an empty grid.
    ///
    /// Layers, bottom to top: grid, obstacles, robot.
    pub fn rasterize(&self, view: &FrameView<'_>) -> Vec<Vec<Cell>> {
        if view.surface.is_empty() {
            return Vec::new();
        }
        let w = view.surface.width as usize;
        let h = view.surface.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        self.draw_grid(&mut grid);
        self.draw_obstacles(&mut grid, view.obstacles);
        self.draw_robot(&mut grid, &view.pose);

        grid
    }

    fn draw_grid(&self, grid: &mut [Vec<Cell>]) {
        let p = &self.projection;
        for (y, row) in grid.iter_mut().enumerate() {
            let on_row = p.has_line(y as f64 * p.units_per_row(), p.units_per_row());
            for (x, cell) in row.iter_mut().enumerate() {
                let on_col = p.has_line(x as f64 * p.units_per_column, p.units_per_column);
                let ch = match (on_row, on_col) {
                    (true, true) => '+',
                    (true, false) | (false, true) => '·',
                    (false, false) => continue,
                };
                *cell = Cell {
                    ch,
                    style: GRID_STYLE,
                };
            }
        }
    }

    fn draw_obstacles(&self, grid: &mut [Vec<Cell>], obstacles: &[Obstacle]) {
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let (wx, wy) = self.projection.cell_center(x as u16, y as u16);
                if obstacles.iter().any(|o| o.contains(wx, wy)) {
                    *cell = Cell {
                        ch: '█',
                        style: OBSTACLE_STYLE,
                    };
                }
            }
        }
    }

    fn draw_robot(&self, grid: &mut [Vec<Cell>], pose: &Pose) {
        let Some((cx, cy)) = self.projection.to_cell(pose.x, pose.y) else {
            return;
        };
        if let Some(cell) = grid
            .get_mut(cy as usize)
            .and_then(|row| row.get_mut(cx as usize))
        {
            *cell = Cell {
                ch: heading_glyph(pose.heading),
                style: ROBOT_STYLE,
            };
        }
    }

    /// Compute a cell-level diff between two grids of the same size.
    ///
    /// Grids of different sizes cannot be diffed meaningfully; callers
    /// repaint in full after a resize.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: *next_cell,
                    });
                }
            }
        }
        changes
    }
}

/// Arrow pointing the way the robot faces, snapped to the nearest 45°.
pub fn heading_glyph(heading: f64) -> char {
    let normalized = heading.rem_euclid(360.0);
    let sector = (normalized / 45.0).round() as usize % HEADING_GLYPHS.len();
    HEADING_GLYPHS[sector]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Surface;

    fn view(pose: Pose, surface: Surface, obstacles: &[Obstacle]) -> FrameView<'_> {
        FrameView {
            pose,
            surface,
            obstacles,
        }
    }

    #[test]
    fn heading_glyph_snaps_to_sectors() {
        assert_eq!(heading_glyph(0.0), '→');
        assert_eq!(heading_glyph(90.0), '↓');
        assert_eq!(heading_glyph(-90.0), '↑');
        assert_eq!(heading_glyph(180.0), '←');
        assert_eq!(heading_glyph(44.0), '↘');
        assert_eq!(heading_glyph(359.0), '→');
        assert_eq!(heading_glyph(720.0 + 270.0), '↑');
    }

    #[test]
    fn zero_surface_draws_nothing() {
        let r = Renderer::default();
        assert!(r.rasterize(&view(Pose::default(), Surface::new(0, 5), &[])).is_empty());
    }

    #[test]
    fn robot_lands_on_projected_cell() {
        let r = Renderer::default();
        let grid = r.rasterize(&view(Pose::new(55.0, 45.0, 90.0), Surface::new(20, 10), &[]));
        assert_eq!(grid.len(), 10);
        assert_eq!(grid[0].len(), 20);
        assert_eq!(grid[2][5].ch, '↓');
        assert_eq!(grid[2][5].style, ROBOT_STYLE);
    }

    #[test]
    fn robot_off_surface_is_clipped() {
        let r = Renderer::default();
        let s = Surface::new(4, 4);
        for pose in [Pose::new(-5.0, 0.0, 0.0), Pose::new(1000.0, 0.0, 0.0)] {
            let grid = r.rasterize(&view(pose, s, &[]));
            assert!(grid.iter().flatten().all(|c| c.style != ROBOT_STYLE));
        }
    }

    #[test]
    fn obstacles_fill_covered_cells() {
        let r = Renderer::default();
        let obstacles = [Obstacle::new(200.0, 100.0, 40.0, 120.0)];
        let grid = r.rasterize(&view(Pose::new(0.0, 0.0, 0.0), Surface::new(30, 15), &obstacles));
        assert_eq!(grid[5][20].ch, '█');
        assert_eq!(grid[10][23].ch, '█');
        assert_ne!(grid[5][24].ch, '█');
        assert_ne!(grid[4][20].ch, '█');
    }

    #[test]
    fn grid_lines_follow_spacing() {
        let r = Renderer::default();
        let grid = r.rasterize(&view(Pose::new(-100.0, -100.0, 0.0), Surface::new(9, 5), &[]));
        assert_eq!(grid[0][0].ch, '+');
        assert_eq!(grid[0][4].ch, '+');
        assert_eq!(grid[0][1].ch, '·');
        assert_eq!(grid[1][0].ch, '·');
        assert_eq!(grid[1][1].ch, ' ');
        assert_eq!(grid[2][8].ch, '+');
    }

    #[test]
    fn diff_reports_only_changed_cells() {
        let r = Renderer::default();
        let s = Surface::new(10, 5);
        let a = r.rasterize(&view(Pose::new(15.0, 30.0, 0.0), s, &[]));
        let b = r.rasterize(&view(Pose::new(25.0, 30.0, 0.0), s, &[]));
        let changes = Renderer::diff(&a, &b);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().any(|c| (c.x, c.y) == (2, 1) && c.cell.ch == '→'));
        assert!(changes.iter().any(|c| (c.x, c.y) == (1, 1) && c.cell.ch == ' '));
    }
}
