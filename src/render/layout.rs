//! Block layout and pagination.
//!
//! The invoice is described as a flat list of [`Block`]s. [`paginate`] flows
//! them down the page frame and produces positioned drawing [`Op`]s, one
//! [`Page`] at a time. Coordinates are PDF points with the origin at the
//! bottom-left corner of the page.

use super::error::RenderError;
use super::metrics::{self, Font};
use super::style::Rgb;

// Slack for floating point comparisons against the frame
const EPSILON: f32 = 0.01;

/// Page size and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 portrait with half-inch margins
    pub const A4: PageGeometry = PageGeometry {
        width: 595.2756,
        height: 841.8898,
        margin: 36.0,
    };

    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn frame_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    fn frame_top(&self) -> f32 {
        self.height - self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub fn new(font: Font, size: f32, color: Rgb) -> Self {
        Self {
            font,
            size,
            leading: size * 1.2,
            color,
        }
    }

    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    /// Distance from the top of a line box to its baseline
    fn ascent(&self) -> f32 {
        self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    /// Default inset of table cells
    pub const CELL: Padding = Padding {
        left: 6.0,
        right: 6.0,
        top: 3.0,
        bottom: 3.0,
    };

    pub fn with_bottom(mut self, bottom: f32) -> Self {
        self.bottom = bottom;
        self
    }
}

/// Wrapped text spanning the frame width
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: TextStyle,
    pub align: Align,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            align: Align::Left,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text { text: String, style: TextStyle },
    /// The document's logo, scaled into the given box
    Image { width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub align: Align,
}

impl Cell {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: CellContent::Text {
                text: text.into(),
                style,
            },
            align: Align::Left,
        }
    }

    pub fn image(width: f32, height: f32) -> Self {
        Self {
            content: CellContent::Image { width, height },
            align: Align::Left,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            CellContent::Text { text, .. } => Some(text),
            CellContent::Image { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub background: Option<Rgb>,
    /// Rule drawn across the table on the row's top edge
    pub rule_above: Option<Stroke>,
    pub padding: Padding,
    pub min_height: f32,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            background: None,
            rule_above: None,
            padding: Padding::CELL,
            min_height: 0.0,
        }
    }

    pub fn with_background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_rule_above(mut self, stroke: Stroke) -> Self {
        self.rule_above = Some(stroke);
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_min_height(mut self, height: f32) -> Self {
        self.min_height = height;
        self
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().filter_map(Cell::as_text)
    }
}

/// Fixed-width columns, centered in the frame.
///
/// The first `header_rows` rows repeat at the top of every page the table
/// continues onto.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Identifies the table in tests and error messages
    pub tag: &'static str,
    pub columns: Vec<f32>,
    pub rows: Vec<Row>,
    pub header_rows: usize,
    pub grid: Option<Stroke>,
    pub valign: VAlign,
}

impl Table {
    pub fn new(tag: &'static str, columns: Vec<f32>) -> Self {
        Self {
            tag,
            columns,
            rows: Vec::new(),
            header_rows: 0,
            grid: None,
            valign: VAlign::Top,
        }
    }

    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_header_rows(mut self, count: usize) -> Self {
        self.header_rows = count;
        self
    }

    pub fn with_grid(mut self, stroke: Stroke) -> Self {
        self.grid = Some(stroke);
        self
    }

    pub fn with_valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn width(&self) -> f32 {
        self.columns.iter().sum()
    }

    /// Rows after the header
    pub fn body(&self) -> &[Row] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Vertical gap; dropped when it falls at the top of a page
    Spacer(f32),
}

/// A positioned drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// `y` is the baseline
    Text {
        x: f32,
        y: f32,
        style: TextStyle,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        stroke: Stroke,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    /// The document's logo with its lower-left corner at `(x, y)`
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<Op>,
}

impl Page {
    /// Every text run on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            Op::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_image(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, Op::Image { .. }))
    }
}

/// Flow `blocks` onto as many pages as they need
pub fn paginate(blocks: &[Block], geometry: PageGeometry) -> Result<Vec<Page>, RenderError> {
    let mut composer = Composer::new(geometry);
    for block in blocks {
        match block {
            Block::Spacer(height) => composer.space(*height),
            Block::Paragraph(paragraph) => composer.paragraph(paragraph)?,
            Block::Table(table) => composer.table(table)?,
        }
    }
    Ok(composer.finish())
}

struct MeasuredRow<'a> {
    row: &'a Row,
    height: f32,
    /// Wrapped lines per cell; empty for image cells
    lines: Vec<Vec<String>>,
}

struct Composer {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    /// Top of the free space on the current page
    cursor: f32,
}

impl Composer {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page::default(),
            cursor: geometry.frame_top(),
        }
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.geometry.margin
    }

    fn at_top(&self) -> bool {
        self.cursor >= self.geometry.frame_top() - EPSILON
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.geometry.frame_top();
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }

    /// Move to a fresh page unless `height` fits below the cursor
    fn reserve(&mut self, height: f32, what: &str) -> Result<(), RenderError> {
        if height > self.remaining() + EPSILON && !self.at_top() {
            self.new_page();
        }
        if height > self.geometry.frame_height() + EPSILON {
            return Err(RenderError::Layout {
                what: what.to_string(),
                height,
                available: self.geometry.frame_height(),
            });
        }
        Ok(())
    }

    fn space(&mut self, height: f32) {
        if self.at_top() {
            return;
        }
        if height > self.remaining() + EPSILON {
            self.new_page();
        } else {
            self.cursor -= height;
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) -> Result<(), RenderError> {
        let style = paragraph.style;
        let width = self.geometry.frame_width();
        for line in metrics::wrap_text(&paragraph.text, style.font, style.size, width) {
            self.reserve(style.leading, "paragraph line")?;
            let x = aligned_x(&line, style, self.geometry.margin, width, paragraph.align);
            let y = self.cursor - style.ascent();
            if !line.is_empty() {
                self.current.ops.push(Op::Text {
                    x,
                    y,
                    style,
                    text: line,
                });
            }
            self.cursor -= style.leading;
        }
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<(), RenderError> {
        let measured: Vec<MeasuredRow> = table.rows.iter().map(|row| measure(table, row)).collect();
        let split = table.header_rows.min(measured.len());
        let (header, body) = measured.split_at(split);
        let header_height: f32 = header.iter().map(|m| m.height).sum();
        let x0 = self.geometry.margin + (self.geometry.frame_width() - table.width()) / 2.0;

        if body.is_empty() {
            self.reserve(header_height, table.tag)?;
            for row in header {
                self.draw_row(table, row, x0);
            }
            return Ok(());
        }

        let mut header_pending = true;
        for row in body {
            let needed = row.height + if header_pending { header_height } else { 0.0 };
            if needed > self.remaining() + EPSILON && !self.at_top() {
                self.new_page();
                header_pending = true;
            }
            let needed = row.height + if header_pending { header_height } else { 0.0 };
            self.reserve(needed, table.tag)?;

            if header_pending {
                for header_row in header {
                    self.draw_row(table, header_row, x0);
                }
                header_pending = false;
            }
            self.draw_row(table, row, x0);
        }
        Ok(())
    }

    fn draw_row(&mut self, table: &Table, measured: &MeasuredRow, x0: f32) {
        let row = measured.row;
        let top = self.cursor;
        let height = measured.height;
        let bottom = top - height;
        let width = table.width();
        let padding = row.padding;

        if let Some(color) = row.background {
            self.current.ops.push(Op::FillRect {
                x: x0,
                y: bottom,
                width,
                height,
                color,
            });
        }

        let mut cell_x = x0;
        for ((cell, column), lines) in row.cells.iter().zip(&table.columns).zip(&measured.lines) {
            let inner_width = column - padding.left - padding.right;
            let inner_height = height - padding.top - padding.bottom;
            let left = cell_x + padding.left;

            match &cell.content {
                CellContent::Text { style, .. } => {
                    let content_height = lines.len() as f32 * style.leading;
                    let mut line_top = content_top(top, padding, inner_height, content_height, table.valign);
                    for line in lines {
                        if !line.is_empty() {
                            self.current.ops.push(Op::Text {
                                x: aligned_x(line, *style, left, inner_width, cell.align),
                                y: line_top - style.ascent(),
                                style: *style,
                                text: line.clone(),
                            });
                        }
                        line_top -= style.leading;
                    }
                }
                CellContent::Image {
                    width: image_width,
                    height: image_height,
                } => {
                    let image_top = content_top(top, padding, inner_height, *image_height, table.valign);
                    let x = match cell.align {
                        Align::Left => left,
                        Align::Center => left + (inner_width - image_width) / 2.0,
                        Align::Right => left + inner_width - image_width,
                    };
                    self.current.ops.push(Op::Image {
                        x,
                        y: image_top - image_height,
                        width: *image_width,
                        height: *image_height,
                    });
                }
            }

            if let Some(stroke) = table.grid {
                self.current.ops.push(Op::StrokeRect {
                    x: cell_x,
                    y: bottom,
                    width: *column,
                    height,
                    stroke,
                });
            }
            cell_x += column;
        }

        if let Some(stroke) = row.rule_above {
            self.current.ops.push(Op::Line {
                from: (x0, top),
                to: (x0 + width, top),
                stroke,
            });
        }

        self.cursor = bottom;
    }
}

fn measure<'a>(table: &Table, row: &'a Row) -> MeasuredRow<'a> {
    let padding = row.padding;
    let mut height = row.min_height;
    let mut lines = Vec::with_capacity(row.cells.len());

    for (cell, column) in row.cells.iter().zip(&table.columns) {
        let inner_width = column - padding.left - padding.right;
        let (cell_lines, content_height) = match &cell.content {
            CellContent::Text { text, style } => {
                let wrapped = metrics::wrap_text(text, style.font, style.size, inner_width);
                let content_height = wrapped.len() as f32 * style.leading;
                (wrapped, content_height)
            }
            CellContent::Image { height, .. } => (Vec::new(), *height),
        };
        height = height.max(content_height + padding.top + padding.bottom);
        lines.push(cell_lines);
    }

    MeasuredRow { row, height, lines }
}

fn content_top(top: f32, padding: Padding, inner_height: f32, content_height: f32, valign: VAlign) -> f32 {
    match valign {
        VAlign::Top => top - padding.top,
        VAlign::Middle => top - padding.top - (inner_height - content_height).max(0.0) / 2.0,
    }
}

fn aligned_x(text: &str, style: TextStyle, left: f32, width: f32, align: Align) -> f32 {
    let text_width = metrics::text_width(text, style.font, style.size);
    match align {
        Align::Left => left,
        Align::Center => left + (width - text_width) / 2.0,
        Align::Right => left + width - text_width,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn body() -> TextStyle {
        TextStyle::new(Font::Helvetica, 10.0, Rgb::BLACK).with_leading(12.0)
    }

    fn small_page() -> PageGeometry {
        PageGeometry {
            width: 200.0,
            height: 100.0,
            margin: 10.0,
        }
    }

    fn numbered_table(rows: usize) -> Table {
        let mut table = Table::new("numbers", vec![100.0])
            .with_header_rows(1)
            .row(Row::new(vec![Cell::text("Header", body())]));
        for i in 0..rows {
            table = table.row(Row::new(vec![Cell::text(format!("row {i}"), body())]));
        }
        table
    }

    #[test]
    fn paragraph_lines_stack_down_from_the_frame_top() {
        let pages = paginate(
            &[Block::Paragraph(Paragraph::new("one\ntwo", body()))],
            small_page(),
        )
        .unwrap();

        let baselines: Vec<f32> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(baselines, vec![80.0, 68.0]);
    }

    #[test]
    fn right_aligned_text_ends_at_the_frame_edge() {
        let style = body();
        let pages = paginate(
            &[Block::Paragraph(Paragraph::new("Total", style).align(Align::Right))],
            small_page(),
        )
        .unwrap();

        let Op::Text { x, .. } = &pages[0].ops[0] else {
            panic!("expected text");
        };
        let end = x + metrics::text_width("Total", style.font, style.size);
        assert!((end - 190.0).abs() < 1e-3);
    }

    #[test]
    fn spacer_at_page_top_is_dropped() {
        let pages = paginate(
            &[
                Block::Spacer(30.0),
                Block::Paragraph(Paragraph::new("first", body())),
            ],
            small_page(),
        )
        .unwrap();

        let Op::Text { y, .. } = &pages[0].ops[0] else {
            panic!("expected text");
        };
        assert_eq!(*y, 80.0);
    }

    #[test]
    fn long_tables_continue_with_their_header() {
        // Each row is 18pt tall and the frame 80pt, so four rows per page
        let pages = paginate(&[Block::Table(numbered_table(6))], small_page()).unwrap();

        assert_eq!(pages.len(), 2);
        let first: Vec<&str> = pages[0].texts().collect();
        let second: Vec<&str> = pages[1].texts().collect();
        assert_eq!(first, vec!["Header", "row 0", "row 1", "row 2"]);
        assert_eq!(second, vec!["Header", "row 3", "row 4", "row 5"]);
    }

    #[test]
    fn header_is_kept_with_the_first_body_row() {
        let blocks = vec![
            Block::Paragraph(Paragraph::new("a\nb\nc\nd", body())),
            Block::Table(numbered_table(1)),
        ];
        let pages = paginate(&blocks, small_page()).unwrap();

        // 48pt of text leaves 32pt, less than header plus one row (36pt)
        assert_eq!(pages.len(), 2);
        let second: Vec<&str> = pages[1].texts().collect();
        assert_eq!(second, vec!["Header", "row 0"]);
    }

    #[test]
    fn oversized_rows_are_a_layout_error() {
        let table = Table::new("tall", vec![100.0])
            .row(Row::new(vec![Cell::text("x", body())]).with_min_height(500.0));
        let err = paginate(&[Block::Table(table)], small_page()).unwrap_err();

        assert!(matches!(err, RenderError::Layout { ref what, .. } if what == "tall"));
    }

    #[test]
    fn middle_aligned_cells_are_centered_vertically() {
        let table = Table::new("bar", vec![100.0])
            .with_valign(VAlign::Middle)
            .row(Row::new(vec![Cell::text("x", body())]).with_min_height(40.0));
        let pages = paginate(&[Block::Table(table)], small_page()).unwrap();

        let Op::Text { y, .. } = &pages[0].ops[0] else {
            panic!("expected text");
        };
        // Row spans 90..50; the 12pt line box sits 11pt below the top padding
        assert!((y - (90.0 - 3.0 - 11.0 - 10.0)).abs() < 1e-3);
    }

    #[test]
    fn backgrounds_grid_and_rules_are_emitted() {
        let stroke = Stroke {
            width: 1.0,
            color: Rgb::GREY,
        };
        let table = Table::new("styled", vec![40.0, 60.0])
            .with_grid(stroke)
            .row(
                Row::new(vec![Cell::text("a", body()), Cell::text("b", body())])
                    .with_background(Rgb::LIGHT_GREY)
                    .with_rule_above(stroke),
            );
        let pages = paginate(&[Block::Table(table)], small_page()).unwrap();
        let ops = &pages[0].ops;

        assert!(matches!(ops[0], Op::FillRect { width, .. } if width == 100.0));
        assert_eq!(ops.iter().filter(|op| matches!(op, Op::StrokeRect { .. })).count(), 2);
        assert!(matches!(ops.last(), Some(Op::Line { .. })));
    }
}
