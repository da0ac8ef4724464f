/// Character-cell rasterizer for the virtual drawing surface
use axograph_core::{Canvas, FontSize, Rect, Rgb, TextAlign};
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: [0, 0, 0],
    bg: [0, 0, 0],
};

/// Maps a `width` x `height` surface onto `cols` x `rows` terminal cells.
/// Shapes paint cell backgrounds; text writes glyphs over them.
pub struct CellCanvas {
    cols: usize,
    rows: usize,
    surface_width: f32,
    surface_height: f32,
    cells: Vec<Cell>,
}

impl CellCanvas {
    pub fn new(cols: usize, rows: usize, surface_width: f32, surface_height: f32) -> Self {
        Self {
            cols,
            rows,
            surface_width,
            surface_height,
            cells: vec![BLANK; cols * rows],
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![BLANK; cols * rows];
    }

    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn scale(&self) -> (f32, f32) {
        (
            self.surface_width / self.cols.max(1) as f32,
            self.surface_height / self.rows.max(1) as f32,
        )
    }

    /// Cell holding a surface point (may be off-grid)
    pub fn to_cell(&self, point: Point2<f32>) -> (i32, i32) {
        let (sx, sy) = self.scale();
        ((point.x / sx).floor() as i32, (point.y / sy).floor() as i32)
    }

    /// Surface point at the centre of a cell
    pub fn to_surface(&self, col: u16, row: u16) -> Point2<f32> {
        let (sx, sy) = self.scale();
        Point2::new((col as f32 + 0.5) * sx, (row as f32 + 0.5) * sy)
    }

    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        self.cell(col as i32, row as i32).map(|c| c.ch)
    }

    pub fn background(&self, col: usize, row: usize) -> Option<Rgb> {
        self.cell(col as i32, row as i32).map(|c| c.bg)
    }

    fn cell(&self, col: i32, row: i32) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    fn paint(&mut self, col: i32, row: i32, color: Rgb) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Cell {
                ch: ' ',
                fg: color,
                bg: color,
            };
        }
    }

    /// Paint every cell whose centre passes `inside`; shapes smaller than a
    /// cell still paint the cell under `fallback`.
    fn paint_where(&mut self, fallback: Point2<f32>, color: Rgb, inside: impl Fn(Point2<f32>) -> bool) {
        let mut painted = false;
        for row in 0..self.rows {
            for col in 0..self.cols {
                if inside(self.to_surface(col as u16, row as u16)) {
                    self.paint(col as i32, row as i32, color);
                    painted = true;
                }
            }
        }
        if !painted {
            let (col, row) = self.to_cell(fallback);
            self.paint(col, row, color);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                if current != Some((cell.fg, cell.bg)) {
                    writer.queue(SetForegroundColor(rgb(cell.fg)))?;
                    writer.queue(SetBackgroundColor(rgb(cell.bg)))?;
                    current = Some((cell.fg, cell.bg));
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn rgb([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

impl Canvas for CellCanvas {
    fn clear(&mut self, color: Rgb) {
        for cell in &mut self.cells {
            *cell = Cell {
                ch: ' ',
                fg: color,
                bg: color,
            };
        }
    }

    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, _thickness: f32, color: Rgb) {
        // Bresenham over cells
        let (mut x0, mut y0) = self.to_cell(from);
        let (x1, y1) = self.to_cell(to);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.paint(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn circle(&mut self, center: Point2<f32>, radius: f32, color: Rgb) {
        self.paint_where(center, color, |p| nalgebra::distance(&p, &center) <= radius);
    }

    fn rect(&mut self, rect: &Rect, _corner_radius: f32, color: Rgb) {
        let rect = *rect;
        self.paint_where(rect.center(), color, |p| rect.contains(&p));
    }

    fn text(&mut self, text: &str, anchor: Point2<f32>, align: TextAlign, _size: FontSize, color: Rgb) {
        let (col, row) = self.to_cell(anchor);
        let len = text.chars().count() as i32;
        let start = match align {
            TextAlign::Center => col - len / 2,
            TextAlign::MidLeft => col,
            TextAlign::MidRight => col - len,
        };
        for (n, ch) in text.chars().enumerate() {
            if let Some(i) = self.index(start + n as i32, row) {
                self.cells[i].ch = ch;
                self.cells[i].fg = color;
            }
        }
    }
}
