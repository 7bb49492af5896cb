//! Invoice PDF rendering.
//!
//! [`render`] turns an invoice and its line items into PDF bytes. It is a pure
//! function of its arguments: the style and the "generated at" timestamp are
//! passed in, so equal input always gives byte-identical output.

mod document;
mod error;
pub mod layout;
mod logo;
mod metrics;
mod pdf;
mod style;
mod text;
mod totals;

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

pub use document::{
    compose, format_date, format_timestamp, item_rows, ItemRow, FALLBACK_ITEM_LABEL, ITEM_HEADERS,
    THANK_YOU,
};
pub use error::{LogoError, RenderError};
pub use layout::{Page, PageGeometry};
pub use logo::Logo;
pub use metrics::{text_width, wrap_text, Font};
pub use pdf::DocumentInfo;
pub use style::{
    ColorParseError, DocumentStyle, Rgb, DEFAULT_ADDRESS_LINE, DEFAULT_BANK_DETAILS,
    DEFAULT_BRAND_COLOR, DEFAULT_COMPANY_NAME, DEFAULT_CONTACT_LINE,
};
pub use text::{escape_markdown, sanitize};
pub use totals::{format_currency, format_quantity, Totals, TAX_LABEL, TAX_RATE};

use crate::models::{Invoice, InvoiceItem};

/// Render `invoice` to PDF bytes.
///
/// The logo named by `style.logo_path` is loaded here; when it is missing or
/// cannot be decoded the header falls back to the company name. Use
/// [`render_with_logo`] to handle logo errors yourself.
pub fn render(
    invoice: &Invoice,
    items: &[InvoiceItem],
    style: &DocumentStyle,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, RenderError> {
    let logo = match style.logo_path.as_deref() {
        Some(path) => Logo::load(path).ok(),
        None => None,
    };
    render_with_logo(invoice, items, style, logo.as_ref(), generated_at)
}

/// Render with an already loaded logo, or the wordmark when `logo` is `None`
pub fn render_with_logo(
    invoice: &Invoice,
    items: &[InvoiceItem],
    style: &DocumentStyle,
    logo: Option<&Logo>,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, RenderError> {
    let geometry = PageGeometry::A4;
    let pages = layout_pages(invoice, items, style, logo, generated_at)?;
    let info = DocumentInfo {
        title: format!("Invoice {}", invoice.id),
        author: sanitize(&style.company_name, false),
        created: generated_at,
    };
    Ok(pdf::write_pdf(&pages, geometry, logo, &info))
}

/// The positioned pages [`render_with_logo`] would write
pub fn layout_pages(
    invoice: &Invoice,
    items: &[InvoiceItem],
    style: &DocumentStyle,
    logo: Option<&Logo>,
    generated_at: NaiveDateTime,
) -> Result<Vec<Page>, RenderError> {
    let blocks = compose(invoice, items, style, logo, generated_at);
    layout::paginate(&blocks, PageGeometry::A4)
}

/// Render and write the document to `path`
pub fn render_to_file(
    invoice: &Invoice,
    items: &[InvoiceItem],
    style: &DocumentStyle,
    logo: Option<&Logo>,
    generated_at: NaiveDateTime,
    path: &Path,
) -> Result<(), RenderError> {
    let bytes = render_with_logo(invoice, items, style, logo, generated_at)?;
    fs::write(path, bytes).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
