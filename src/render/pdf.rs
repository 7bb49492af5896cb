//! Serialization of laid out pages with `pdf-writer`

use chrono::{Datelike, NaiveDateTime, Timelike};
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::layout::{Op, Page, PageGeometry};
use super::logo::Logo;
use super::metrics::Font;
use super::text::encode_win_ansi;

const LOGO_NAME: Name<'static> = Name(b"Im1");
const PRODUCER: &str = "InvoicePro";

/// Document information dictionary entries
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub created: NaiveDateTime,
}

/// Hands out sequential object ids
struct RefAllocator(i32);

impl RefAllocator {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Write `pages` as a complete PDF file.
///
/// Output depends only on the arguments, so equal inputs give equal bytes.
pub fn write_pdf(
    pages: &[Page],
    geometry: PageGeometry,
    logo: Option<&Logo>,
    info: &DocumentInfo,
) -> Vec<u8> {
    let mut refs = RefAllocator(0);
    let catalog_id = refs.next();
    let page_tree_id = refs.next();
    let regular_id = refs.next();
    let bold_id = refs.next();
    let info_id = refs.next();
    let image_id = logo.map(|_| refs.next());
    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (refs.next(), refs.next())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(pages.len() as i32);

    // Standard fonts need no embedding
    for (id, font) in [(regular_id, Font::Helvetica), (bold_id, Font::HelveticaBold)] {
        pdf.type1_font(id)
            .base_font(Name(font.base_name()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    if let (Some(logo), Some(id)) = (logo, image_id) {
        let mut image = pdf.image_xobject(id, logo.data());
        image.filter(Filter::FlateDecode);
        image.width(logo.width() as i32);
        image.height(logo.height() as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();
    }

    for (page, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut writer = pdf.page(*page_id);
        writer.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height));
        writer.parent(page_tree_id);
        writer.contents(*content_id);
        {
            let mut resources = writer.resources();
            resources
                .fonts()
                .pair(Name(Font::Helvetica.resource_name()), regular_id)
                .pair(Name(Font::HelveticaBold.resource_name()), bold_id);
            if let Some(id) = image_id.filter(|_| page.has_image()) {
                resources.x_objects().pair(LOGO_NAME, id);
            }
        }
        writer.finish();

        let stream = page_content(page, image_id.is_some());
        pdf.stream(*content_id, &stream);
    }

    pdf.document_info(info_id)
        .title(TextStr(&info.title))
        .author(TextStr(&info.author))
        .producer(TextStr(PRODUCER))
        .creation_date(pdf_date(info.created));

    pdf.finish()
}

fn page_content(page: &Page, has_logo: bool) -> Vec<u8> {
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            Op::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (r, g, b) = color.components();
                content.save_state();
                content.set_fill_rgb(r, g, b);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
            Op::StrokeRect {
                x,
                y,
                width,
                height,
                stroke,
            } => {
                let (r, g, b) = stroke.color.components();
                content.save_state();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(stroke.width);
                content.rect(*x, *y, *width, *height);
                content.stroke();
                content.restore_state();
            }
            Op::Line { from, to, stroke } => {
                let (r, g, b) = stroke.color.components();
                content.save_state();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(stroke.width);
                content.move_to(from.0, from.1);
                content.line_to(to.0, to.1);
                content.stroke();
                content.restore_state();
            }
            Op::Text { x, y, style, text } => {
                let (r, g, b) = style.color.components();
                content.save_state();
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(style.font.resource_name()), style.size);
                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, *y]);
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
                content.restore_state();
            }
            Op::Image {
                x,
                y,
                width,
                height,
            } => {
                // Without a registered XObject the reference would dangle
                if has_logo {
                    content.save_state();
                    content.transform([*width, 0.0, 0.0, *height, *x, *y]);
                    content.x_object(LOGO_NAME);
                    content.restore_state();
                }
            }
        }
    }
    content.finish()
}

fn pdf_date(at: NaiveDateTime) -> Date {
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
}
