// PDF backend: turns a laid-out Document into bytes with printpdf

use super::layout::{Document, FontStyle};
use crate::error::{JarError, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

const LAYER_NAME: &str = "Layer 1";

fn pdf_error<E: std::fmt::Debug>(err: E) -> JarError {
    JarError::Pdf(format!("{:?}", err))
}

struct Fonts {
    normal: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        Ok(Self {
            normal: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Normal => &self.normal,
            FontStyle::Bold => &self.bold,
        }
    }
}

/// Serialise `document` to PDF bytes, one PDF page per layout page.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>> {
    let width = Mm(document.geometry.width);
    let height = Mm(document.geometry.height);

    let (pdf, first_page, first_layer) = PdfDocument::new(document.title.as_str(), width, height, LAYER_NAME);
    let fonts = Fonts::load(&pdf)?;

    for (index, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(width, height, LAYER_NAME)
        };
        let layer = pdf.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            // Layout measures y from the top; PDF from the bottom
            let y = document.geometry.height - line.y;
            layer.use_text(line.text.as_str(), line.font_size, Mm(line.x), Mm(y), fonts.get(line.style));
        }
    }

    pdf.save_to_bytes().map_err(pdf_error)
}
