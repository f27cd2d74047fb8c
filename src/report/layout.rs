// Page model and the vertical cursor used while laying out a report
//
// Coordinates are millimetres measured from the top-left corner of the page;
// `y` is the text baseline. The PDF backend flips to bottom-left on output.

use super::metrics::text_width_mm;
use serde::Serialize;

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

/// A4 portrait in millimetres, with the margins both reports use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Where the cursor starts on every page
    pub top_margin: f32,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        top_margin: 20.0,
    };
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::A4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontStyle {
    Normal,
    Bold,
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    /// Left edge, already resolved for centered text
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub style: FontStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

/// A fully laid-out report, ready to hand to the PDF backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }

    /// (page index, line) for every line, in emission order
    pub fn positioned_lines(&self) -> impl Iterator<Item = (usize, &TextLine)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(index, page)| page.lines.iter().map(move |line| (index, line)))
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines().map(|line| line.text.as_str()).collect()
    }

    /// First line whose text equals `text`, with its page index
    pub fn find(&self, text: &str) -> Option<(usize, &TextLine)> {
        self.positioned_lines().find(|(_, line)| line.text == text)
    }
}

// ============================================================================
// PAGE WRITER
// ============================================================================

/// Stateful writer: current font, current page, and the vertical cursor.
pub struct PageWriter {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
    font_size: f32,
    style: FontStyle,
}

impl PageWriter {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            y: geometry.top_margin,
            font_size: 16.0,
            style: FontStyle::Normal,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn set_font(&mut self, style: FontStyle, font_size: f32) {
        self.style = style;
        self.font_size = font_size;
    }

    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Start a new page when the cursor is past `height - bottom_margin`.
    ///
    /// Returns true when a page was added.
    pub fn break_if_below(&mut self, bottom_margin: f32) -> bool {
        if self.y > self.geometry.height - bottom_margin {
            self.add_page();
            true
        } else {
            false
        }
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.geometry.top_margin;
    }

    /// Emit `text` with its left edge at `x` on the current baseline.
    pub fn text(&mut self, text: impl Into<String>, x: f32) {
        let line = TextLine {
            text: text.into(),
            x,
            y: self.y,
            font_size: self.font_size,
            style: self.style,
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
    }

    /// Emit `text` centered on the page width.
    pub fn centered(&mut self, text: impl Into<String>) {
        let text = text.into();
        let width = text_width_mm(&text, self.font_size, self.style);
        let x = (self.geometry.width - width) / 2.0;
        self.text(text, x);
    }

    pub fn finish(self, title: impl Into<String>) -> Document {
        Document {
            title: title.into(),
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_starts_at_top_margin() {
        let writer = PageWriter::new(PageGeometry::A4);
        assert_eq!(writer.y(), 20.0);
        assert_eq!(writer.page_count(), 1);
    }

    #[test]
    fn test_break_only_past_threshold() {
        let mut writer = PageWriter::new(PageGeometry::A4);

        writer.advance(217.0); // y = 237 = 297 - 60, not past it
        assert!(!writer.break_if_below(60.0));
        assert_eq!(writer.page_count(), 1);

        writer.advance(0.5);
        assert!(writer.break_if_below(60.0));
        assert_eq!(writer.page_count(), 2);
        assert_eq!(writer.y(), 20.0);
    }

    #[test]
    fn test_text_uses_current_font_and_cursor() {
        let mut writer = PageWriter::new(PageGeometry::A4);
        writer.set_font(FontStyle::Bold, 14.0);
        writer.advance(5.0);
        writer.text("Summary", 15.0);

        let doc = writer.finish("t");
        let line = &doc.pages[0].lines[0];
        assert_eq!(line.text, "Summary");
        assert_eq!(line.x, 15.0);
        assert_eq!(line.y, 25.0);
        assert_eq!(line.font_size, 14.0);
        assert_eq!(line.style, FontStyle::Bold);
    }

    #[test]
    fn test_centered_text_is_symmetric() {
        let mut writer = PageWriter::new(PageGeometry::A4);
        writer.set_font(FontStyle::Normal, 10.0);
        writer.centered("Generated on: 1/2/2026");

        let doc = writer.finish("t");
        let line = &doc.pages[0].lines[0];
        let width = text_width_mm(&line.text, 10.0, FontStyle::Normal);
        let right_gap = 210.0 - (line.x + width);
        assert!((line.x - right_gap).abs() < 1e-3);
    }

    #[test]
    fn test_document_find_reports_page() {
        let mut writer = PageWriter::new(PageGeometry::A4);
        writer.text("first", 20.0);
        writer.add_page();
        writer.text("second", 20.0);

        let doc = writer.finish("t");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.find("second").map(|(page, _)| page), Some(1));
        assert_eq!(doc.texts(), vec!["first", "second"]);
    }
}
