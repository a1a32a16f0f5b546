//! The cell-addressed display surface.

use crate::cell::{Cell, Color, Half, Patch, Style, Underline, ERASE_SENTINEL};
use crate::cluster::InternTable;
use crate::segment;
use vtwidth::WidthTable;

/// Attributes applied to every cell produced by one `write` call.
#[derive(Debug, Clone, Default)]
pub struct WriteAttrs {
    pub fg: Color,
    pub bg: Color,
    pub deco: Color,
    pub style: Style,
    pub underline: Underline,
    pub patch: Option<Patch>,
    pub softwrap: bool,
}

/// How `copy_rect` should treat source coordinates outside the source
/// rectangle's own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileBehavior {
    /// Cells outside the source surface read as default-blank.
    Blank,
    /// Cells outside the source surface wrap around its dimensions.
    Wrap,
}

pub struct Surface {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    interner: InternTable,
    table: WidthTable,
}

impl Surface {
    #[must_use]
    pub fn new(width: usize, height: usize, table: WidthTable) -> Self {
        assert!(width >= 1 && height >= 1, "surface dimensions must be at least 1x1");
        let mut interner = InternTable::new();
        let blank = interner.ensure(&[ERASE_SENTINEL], |_| {});
        let cells = vec![Cell::new(blank, Half::Single); width * height];
        Surface { width, height, cells, interner, table }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height { Some(y * self.width + x) } else { None }
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// UTF-8 bytes of the cluster at `(x, y)`, or the default-blank erase
    /// sentinel for out-of-range coordinates.
    #[must_use]
    pub fn cell_text(&self, x: usize, y: usize) -> &[u8] {
        match self.cell(x, y) {
            Some(cell) => self.interner.bytes(cell.text),
            None => &[ERASE_SENTINEL],
        }
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let idx = self.index(x, y).expect("coordinate out of bounds");
        &mut self.cells[idx]
    }

    fn intern(&mut self, bytes: &[u8]) -> crate::cluster::InternId {
        let cells = &self.cells;
        self.interner.ensure(bytes, |table| {
            for cell in cells {
                table.mark(cell.text);
            }
        })
    }

    #[must_use]
    pub fn intern_table_len(&self) -> usize {
        self.interner.len()
    }

    /// Run a mark/sweep collection now, regardless of load factor.
    pub fn collect_garbage(&mut self) {
        self.interner.mark_all_unused();
        for cell in &self.cells {
            self.interner.mark(cell.text);
        }
        let freed = self.interner.sweep();
        if freed == 0 {
            self.interner.grow();
        }
    }

    fn split_if_right_half(&mut self, x: usize, y: usize) {
        let Some(cell) = self.cell(x, y) else { return };
        if !cell.is_right_half() || x == 0 {
            return;
        }
        self.replace_pair_with_fffd(x - 1, x, y);
    }

    fn split_if_left_half(&mut self, x: usize, y: usize) {
        let Some(cell) = self.cell(x, y) else { return };
        if !cell.is_left_half() || x + 1 >= self.width {
            return;
        }
        self.replace_pair_with_fffd(x, x + 1, y);
    }

    fn replace_pair_with_fffd(&mut self, left_x: usize, right_x: usize, y: usize) {
        let attrs = {
            let left = self.cell(left_x, y).expect("left half exists");
            (left.fg, left.bg, left.deco, left.style, left.underline, left.patch.clone(), left.softwrap)
        };
        let id = self.intern("\u{FFFD}".as_bytes());
        *self.cell_mut(left_x, y) = fffd_cell(id, Half::Single, &attrs);
        let id = self.intern(&[ERASE_SENTINEL]);
        *self.cell_mut(right_x, y) = fffd_cell(id, Half::Single, &attrs);
    }

    /// Write `text` starting at `(x, y)`, one grapheme cluster per cell (two
    /// for wide clusters). Stops at the end of the row; never wraps.
    /// Returns the number of columns advanced.
    pub fn write(&mut self, x: usize, y: usize, text: &str, attrs: &WriteAttrs) -> usize {
        if y >= self.height || x >= self.width {
            return 0;
        }
        let start_x = x;
        let mut cx = x;
        for cluster in segment::clusters(self.table, text) {
            if cx >= self.width {
                break;
            }
            let base = segment::base_code_point(cluster);
            let width = vtwidth::display_width(self.table, base);

            self.split_if_right_half(cx, y);

            if width == 2 {
                if cx + 1 >= self.width {
                    self.write_fffd_single(cx, y, attrs);
                    cx += 1;
                    continue;
                }
                self.split_if_left_half(cx + 1, y);
                let id = self.intern(cluster.as_bytes());
                *self.cell_mut(cx, y) = styled_cell(id, Half::Left, attrs);
                *self.cell_mut(cx + 1, y) = styled_cell(id, Half::Right, attrs);
                cx += 2;
            } else {
                let id = self.intern(cluster.as_bytes());
                *self.cell_mut(cx, y) = styled_cell(id, Half::Single, attrs);
                cx += 1;
            }
        }
        cx - start_x
    }

    fn write_fffd_single(&mut self, x: usize, y: usize, attrs: &WriteAttrs) {
        let id = self.intern("\u{FFFD}".as_bytes());
        *self.cell_mut(x, y) = styled_cell(id, Half::Single, attrs);
    }

    pub fn clear_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        let blank = self.intern(&[ERASE_SENTINEL]);
        let end_y = (y + h).min(self.height);
        let end_x = (x + w).min(self.width);
        for row in y..end_y {
            if x > 0 {
                self.split_if_left_half(x - 1, row);
            }
            if end_x < self.width {
                self.split_if_right_half(end_x, row);
            }
            for col in x..end_x {
                *self.cell_mut(col, row) = Cell::new(blank, Half::Single);
            }
        }
    }

    pub fn clear(&mut self) {
        let (w, h) = (self.width, self.height);
        self.clear_rect(0, 0, w, h);
    }

    /// Copy a `w`x`h` rectangle from `src` starting at `(sx, sy)` into this
    /// surface starting at `(dx, dy)`. Negative/out-of-bounds source
    /// coordinates are resolved per `tile`.
    pub fn copy_rect(
        &mut self,
        src: &Surface,
        sx: i64,
        sy: i64,
        w: usize,
        h: usize,
        dx: i64,
        dy: i64,
        tile: TileBehavior,
    ) {
        for row in 0..h {
            for col in 0..w {
                let ddx = dx + col as i64;
                let ddy = dy + row as i64;
                if ddx < 0 || ddy < 0 || ddx as usize >= self.width || ddy as usize >= self.height {
                    continue;
                }
                let (ddx, ddy) = (ddx as usize, ddy as usize);

                let resolved = resolve_src_coord(src, sx + col as i64, sy + row as i64, tile);
                let Some((ssx, ssy)) = resolved else {
                    let blank = self.intern(&[ERASE_SENTINEL]);
                    *self.cell_mut(ddx, ddy) = Cell::new(blank, Half::Single);
                    continue;
                };

                let src_cell = src.cell(ssx, ssy).expect("resolved coordinate is in range").clone();
                let bisected_right = src_cell.is_right_half() && col == 0;
                let bisected_left = src_cell.is_left_half() && col + 1 == w;

                if bisected_right || bisected_left {
                    let attrs = (
                        src_cell.fg,
                        src_cell.bg,
                        src_cell.deco,
                        src_cell.style,
                        src_cell.underline,
                        src_cell.patch.clone(),
                        src_cell.softwrap,
                    );
                    let id = self.intern("\u{FFFD}".as_bytes());
                    *self.cell_mut(ddx, ddy) = fffd_cell(id, Half::Single, &attrs);
                } else {
                    let bytes = src.interner.bytes(src_cell.text).to_vec();
                    let id = self.intern(&bytes);
                    let mut cell = Cell::new(id, src_cell.half);
                    cell.fg = src_cell.fg;
                    cell.bg = src_cell.bg;
                    cell.deco = src_cell.deco;
                    cell.style = src_cell.style;
                    cell.underline = src_cell.underline;
                    cell.patch = src_cell.patch;
                    cell.softwrap = src_cell.softwrap;
                    *self.cell_mut(ddx, ddy) = cell;
                }
            }
        }
    }

    /// Resize to `new_width` x `new_height`, preserving overlapping content
    /// and clearing newly exposed regions.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        assert!(new_width >= 1 && new_height >= 1);
        let blank = self.interner.ensure(&[ERASE_SENTINEL], |_| {});
        let mut new_cells = vec![Cell::new(blank, Half::Single); new_width * new_height];
        for y in 0..new_height.min(self.height) {
            for x in 0..new_width.min(self.width) {
                new_cells[y * new_width + x] = self.cells[y * self.width + x].clone();
            }
        }
        self.width = new_width;
        self.height = new_height;
        self.cells = new_cells;

        let last_x = self.width - 1;
        for y in 0..self.height {
            if let Some(cell) = self.cell(last_x, y) {
                if cell.is_left_half() {
                    let attrs = (
                        cell.fg,
                        cell.bg,
                        cell.deco,
                        cell.style,
                        cell.underline,
                        cell.patch.clone(),
                        cell.softwrap,
                    );
                    let id = self.intern("\u{FFFD}".as_bytes());
                    *self.cell_mut(last_x, y) = fffd_cell(id, Half::Single, &attrs);
                }
            }
        }
        self.collect_garbage();
    }
}

fn resolve_src_coord(src: &Surface, x: i64, y: i64, tile: TileBehavior) -> Option<(usize, usize)> {
    match tile {
        TileBehavior::Blank => {
            if x < 0 || y < 0 || x as usize >= src.width || y as usize >= src.height {
                None
            } else {
                Some((x as usize, y as usize))
            }
        }
        TileBehavior::Wrap => {
            let w = src.width as i64;
            let h = src.height as i64;
            let wx = x.rem_euclid(w) as usize;
            let wy = y.rem_euclid(h) as usize;
            Some((wx, wy))
        }
    }
}

type AttrTuple = (Color, Color, Color, Style, Underline, Option<Patch>, bool);

fn fffd_cell(id: crate::cluster::InternId, half: Half, attrs: &AttrTuple) -> Cell {
    let mut cell = Cell::new(id, half);
    cell.fg = attrs.0;
    cell.bg = attrs.1;
    cell.deco = attrs.2;
    cell.style = attrs.3;
    cell.underline = attrs.4;
    cell.patch.clone_from(&attrs.5);
    cell.softwrap = attrs.6;
    cell
}

fn styled_cell(id: crate::cluster::InternId, half: Half, attrs: &WriteAttrs) -> Cell {
    let mut cell = Cell::new(id, half);
    cell.fg = attrs.fg;
    cell.bg = attrs.bg;
    cell.deco = attrs.deco;
    cell.style = attrs.style;
    cell.underline = attrs.underline;
    cell.patch.clone_from(&attrs.patch);
    cell.softwrap = attrs.softwrap;
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back_narrow_cluster() {
        let mut s = Surface::new(10, 1, WidthTable::Default);
        s.write(0, 0, "A", &WriteAttrs::default());
        assert_eq!(s.cell_text(0, 0), b"A");
        assert_eq!(s.cell(0, 0).unwrap().width(), 1);
    }

    #[test]
    fn write_wide_cluster_occupies_two_cells() {
        let mut s = Surface::new(10, 1, WidthTable::Default);
        s.write(0, 0, "\u{304C}", &WriteAttrs::default());
        assert_eq!(s.cell_text(0, 0), "\u{304C}".as_bytes());
        assert!(s.cell(0, 0).unwrap().is_left_half());
        assert!(s.cell(1, 0).unwrap().is_right_half());
    }

    #[test]
    fn write_wide_cluster_at_last_column_emits_replacement() {
        let mut s = Surface::new(3, 1, WidthTable::Default);
        s.write(2, 0, "\u{304C}", &WriteAttrs::default());
        assert_eq!(s.cell_text(2, 0), "\u{FFFD}".as_bytes());
    }

    #[test]
    fn overwriting_right_half_splits_existing_wide_cluster() {
        let mut s = Surface::new(10, 1, WidthTable::Default);
        s.write(0, 0, "\u{304C}", &WriteAttrs::default());
        s.write(1, 0, "x", &WriteAttrs::default());
        assert_eq!(s.cell_text(0, 0), "\u{FFFD}".as_bytes());
        assert_eq!(s.cell_text(1, 0), b"x");
    }

    #[test]
    fn write_stops_at_row_end_without_wrapping() {
        let mut s = Surface::new(3, 1, WidthTable::Default);
        let advanced = s.write(0, 0, "abcdef", &WriteAttrs::default());
        assert_eq!(advanced, 3);
        assert_eq!(s.cell_text(2, 0), b"c");
    }

    #[test]
    fn clear_resets_to_erase_sentinel() {
        let mut s = Surface::new(3, 1, WidthTable::Default);
        s.write(0, 0, "abc", &WriteAttrs::default());
        s.clear();
        assert_eq!(s.cell_text(0, 0), [ERASE_SENTINEL]);
    }

    #[test]
    fn resize_preserves_overlap_and_clears_new_region() {
        let mut s = Surface::new(3, 1, WidthTable::Default);
        s.write(0, 0, "ab", &WriteAttrs::default());
        s.resize(5, 1);
        assert_eq!(s.cell_text(0, 0), b"a");
        assert_eq!(s.cell_text(1, 0), b"b");
        assert_eq!(s.cell_text(4, 0), [ERASE_SENTINEL]);
    }

    #[test]
    fn resize_narrower_replaces_dangling_wide_cluster_half() {
        let mut s = Surface::new(4, 1, WidthTable::Default);
        s.write(0, 0, "\u{304C}", &WriteAttrs::default());
        s.resize(1, 1);
        assert_eq!(s.cell_text(0, 0), "\u{FFFD}".as_bytes());
    }

    #[test]
    fn copy_rect_preserves_content() {
        let mut src = Surface::new(3, 1, WidthTable::Default);
        src.write(0, 0, "abc", &WriteAttrs::default());
        let mut dst = Surface::new(3, 1, WidthTable::Default);
        dst.copy_rect(&src, 0, 0, 3, 1, 0, 0, TileBehavior::Blank);
        assert_eq!(dst.cell_text(1, 0), b"b");
    }

    #[test]
    fn copy_rect_bisecting_wide_cluster_emits_replacement() {
        let mut src = Surface::new(3, 1, WidthTable::Default);
        src.write(0, 0, "\u{304C}", &WriteAttrs::default());
        let mut dst = Surface::new(1, 1, WidthTable::Default);
        dst.copy_rect(&src, 1, 0, 1, 1, 0, 0, TileBehavior::Blank);
        assert_eq!(dst.cell_text(0, 0), "\u{FFFD}".as_bytes());
    }

    #[test]
    fn interning_gc_reclaims_after_clear() {
        let mut s = Surface::new(20, 1, WidthTable::Default);
        for i in 0..20 {
            let ch = (b'a' + (i % 26) as u8) as char;
            s.write(i, 0, &ch.to_string(), &WriteAttrs::default());
        }
        s.clear();
        s.collect_garbage();
        // Only the erase-sentinel blank entry should remain referenced.
        assert_eq!(s.intern_table_len(), 1);
    }
}
