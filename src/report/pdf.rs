//! Paged A4 document on top of printpdf.
//!
//! All coordinates here are millimetres measured from the top-left corner of
//! the page; conversion to PDF user space (bottom-left origin) happens in
//! [`Canvas`].

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, LineDashPattern, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb, TextMatrix,
};

use super::ReportError;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// Usable width between the side margins.
pub const BODY_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

/// First body line below the page header.
const BODY_TOP_MM: f32 = 25.0;
/// Content crossing this line moves to the next page.
const BODY_BOTTOM_MM: f32 = PAGE_HEIGHT_MM - 20.0;

const PT_TO_MM: f32 = 0.352_778;

pub const HEADER_TEXT: &str = "ElectrIA - Reporte de Consumo Energetico";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8(0, 0, 0);
    pub const GRID: Rgb8 = Rgb8(210, 210, 210);
    pub const BLUE: Rgb8 = Rgb8(31, 119, 180);
    pub const ORANGE: Rgb8 = Rgb8(255, 127, 14);

    fn to_color(self) -> Color {
        Color::Rgb(Rgb::new(
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
            None,
        ))
    }
}

/// Approximate advance width of Helvetica text.
///
/// The builtin fonts carry no metrics in printpdf, so an average glyph width
/// of half an em is assumed.
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.5 * PT_TO_MM
}

/// Shortens `text` to at most `max_chars` characters, marking the cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(2)).collect();
    out.push_str("..");
    out
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Drawing surface of one page layer.
pub struct Canvas<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a Fonts,
}

impl Canvas<'_> {
    fn point(x: f32, y: f32) -> Point {
        Point::new(Mm(x), Mm(PAGE_HEIGHT_MM - y))
    }

    pub fn text(&self, text: &str, size_pt: f32, style: FontStyle, x: f32, baseline: f32) {
        self.layer.use_text(
            text,
            size_pt,
            Mm(x),
            Mm(PAGE_HEIGHT_MM - baseline),
            self.fonts.get(style),
        );
    }

    pub fn text_centered(&self, text: &str, size_pt: f32, style: FontStyle, center_x: f32, baseline: f32) {
        let x = center_x - text_width_mm(text, size_pt) / 2.0;
        self.text(text, size_pt, style, x, baseline);
    }

    pub fn text_right(&self, text: &str, size_pt: f32, style: FontStyle, right_x: f32, baseline: f32) {
        let x = right_x - text_width_mm(text, size_pt);
        self.text(text, size_pt, style, x, baseline);
    }

    /// Text starting at (`x`, `baseline`), turned `degrees` counter-clockwise.
    pub fn text_rotated(&self, text: &str, size_pt: f32, style: FontStyle, x: f32, baseline: f32, degrees: f32) {
        let font = self.fonts.get(style);
        self.layer.begin_text_section();
        self.layer.set_font(font, size_pt);
        self.layer.set_text_matrix(TextMatrix::TranslateRotate(
            Mm(x).into(),
            Mm(PAGE_HEIGHT_MM - baseline).into(),
            degrees,
        ));
        self.layer.write_text(text, font);
        self.layer.end_text_section();
    }

    pub fn set_text_color(&self, color: Rgb8) {
        self.layer.set_fill_color(color.to_color());
    }

    pub fn set_stroke(&self, color: Rgb8, width_pt: f32) {
        self.layer.set_outline_color(color.to_color());
        self.layer.set_outline_thickness(width_pt);
    }

    /// Dash and gap lengths in points; `None` draws solid lines.
    pub fn set_dash(&self, pattern: Option<(i64, i64)>) {
        let dash = match pattern {
            Some((dash, gap)) => LineDashPattern {
                dash_1: Some(dash),
                gap_1: Some(gap),
                ..Default::default()
            },
            None => LineDashPattern::default(),
        };
        self.layer.set_line_dash_pattern(dash);
    }

    pub fn polyline(&self, points: &[(f32, f32)], closed: bool) {
        if points.len() < 2 {
            return;
        }
        self.layer.add_line(Line {
            points: points.iter().map(|&(x, y)| (Self::point(x, y), false)).collect(),
            is_closed: closed,
        });
    }

    pub fn line(&self, from: (f32, f32), to: (f32, f32)) {
        self.polyline(&[from, to], false);
    }

    pub fn rect(&self, x: f32, y: f32, width: f32, height: f32) {
        self.polyline(
            &[(x, y), (x + width, y), (x + width, y + height), (x, y + height)],
            true,
        );
    }

    /// Small octagon outline centred on (`x`, `y`).
    pub fn marker(&self, x: f32, y: f32, radius: f32) {
        let points: Vec<(f32, f32)> = (0..8)
            .map(|i| {
                let angle = std::f32::consts::FRAC_PI_4 * i as f32;
                (x + radius * angle.cos(), y + radius * angle.sin())
            })
            .collect();
        self.polyline(&points, true);
    }
}

/// Multi-page report with the running header and page-number footer.
pub struct ReportDocument {
    doc: PdfDocumentReference,
    fonts: Fonts,
    layer: PdfLayerReference,
    page_no: usize,
    cursor: f32,
}

impl ReportDocument {
    pub fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let fonts = Fonts {
            regular: builtin_font(&doc, BuiltinFont::Helvetica)?,
            bold: builtin_font(&doc, BuiltinFont::HelveticaBold)?,
            italic: builtin_font(&doc, BuiltinFont::HelveticaOblique)?,
        };
        let layer = doc.get_page(page).get_layer(layer);

        let report = Self {
            doc,
            fonts,
            layer,
            page_no: 1,
            cursor: BODY_TOP_MM,
        };
        report.decorate_page();
        Ok(report)
    }

    fn decorate_page(&self) {
        let canvas = self.canvas();
        canvas.set_text_color(Rgb8::BLACK);
        canvas.text_centered(HEADER_TEXT, 15.0, FontStyle::Bold, PAGE_WIDTH_MM / 2.0, MARGIN_MM + 7.0);
        canvas.text_centered(
            &format!("Pagina {}", self.page_no),
            8.0,
            FontStyle::Italic,
            PAGE_WIDTH_MM / 2.0,
            PAGE_HEIGHT_MM - 9.0,
        );
    }

    pub fn add_page(&mut self) {
        self.page_no += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            format!("Layer {}", self.page_no),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = BODY_TOP_MM;
        self.decorate_page();
    }

    /// Starts a new page unless `height` fits above the bottom margin.
    pub fn ensure_space(&mut self, height: f32) {
        if self.cursor + height > BODY_BOTTOM_MM {
            self.add_page();
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn advance(&mut self, height: f32) {
        self.cursor += height;
    }

    pub fn page_count(&self) -> usize {
        self.page_no
    }

    pub fn canvas(&self) -> Canvas<'_> {
        Canvas {
            layer: &self.layer,
            fonts: &self.fonts,
        }
    }

    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))
    }
}

fn builtin_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, ReportError> {
    doc.add_builtin_font(font)
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))
}
