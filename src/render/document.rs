//! The invoice layout: header, company, metadata, bill-to, items, totals,
//! payment instructions, notes and footer, in that order.

use chrono::{NaiveDate, NaiveDateTime};

use super::layout::{Align, Block, Cell, Padding, Paragraph, Row, Stroke, Table, TextStyle, VAlign};
use super::logo::Logo;
use super::metrics::Font;
use super::style::{DocumentStyle, Rgb};
use super::text::sanitize;
use super::totals::{format_currency, format_quantity, Totals, TAX_LABEL};
use crate::models::{Invoice, InvoiceItem};

/// Description of the synthetic row printed for an invoice without items
pub const FALLBACK_ITEM_LABEL: &str = "Services Rendered";
pub const ITEM_HEADERS: [&str; 4] = ["Description", "Qty", "Unit Price", "Line Total"];
pub const THANK_YOU: &str = "Thank you for your business!";

pub const LOGO_WIDTH: f32 = 80.0;
pub const LOGO_HEIGHT: f32 = 40.0;

/// One printed row of the line item table
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
}

/// Rows of the line item table.
///
/// An invoice without items still gets one row, billing the stored amount
/// once under its description.
pub fn item_rows(invoice: &Invoice, items: &[InvoiceItem]) -> Vec<ItemRow> {
    if items.is_empty() {
        let amount = format_currency(invoice.amount);
        return vec![ItemRow {
            description: invoice.notes().unwrap_or(FALLBACK_ITEM_LABEL).to_string(),
            quantity: "1".to_string(),
            unit_price: amount.clone(),
            line_total: amount,
        }];
    }

    items
        .iter()
        .map(|item| ItemRow {
            description: item.description.clone(),
            quantity: format_quantity(item.quantity),
            unit_price: format_currency(item.price),
            line_total: format_currency(item.line_total()),
        })
        .collect()
}

/// `YYYY-MM-DD`, or empty when the date is missing
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Text styles derived from the brand color
struct Styles {
    brand: Rgb,
    body: TextStyle,
    heading: TextStyle,
    small_grey: TextStyle,
}

impl Styles {
    fn new(brand: Rgb) -> Self {
        let body = TextStyle::new(Font::Helvetica, 10.0, Rgb::BLACK).with_leading(12.0);
        Self {
            brand,
            body,
            heading: TextStyle { font: Font::HelveticaBold, color: brand, ..body },
            small_grey: TextStyle { size: 9.0, color: Rgb::GREY, ..body },
        }
    }

    fn bold(&self, size: f32, color: Rgb) -> TextStyle {
        TextStyle::new(Font::HelveticaBold, size, color)
    }
}

/// Lay out `invoice` as a sequence of blocks.
///
/// `logo` replaces the company wordmark in the header when present.
/// `generated_at` is printed in the footer and is the only time source.
pub fn compose(
    invoice: &Invoice,
    items: &[InvoiceItem],
    style: &DocumentStyle,
    logo: Option<&Logo>,
    generated_at: NaiveDateTime,
) -> Vec<Block> {
    let styles = Styles::new(style.brand_color);
    let totals = Totals::compute(invoice, items);
    let mut blocks = Vec::new();

    // Header: logo or wordmark on the left, title on the right
    let brand_cell = match logo {
        Some(_) => Cell::image(LOGO_WIDTH, LOGO_HEIGHT),
        None => Cell::text(clean(&style.company_name), styles.bold(16.0, Rgb::BLACK)),
    };
    let header = Table::new("header", vec![300.0, 220.0])
        .with_valign(VAlign::Middle)
        .row(Row::new(vec![
            brand_cell,
            Cell::text("INVOICE", styles.bold(20.0, styles.brand)).align(Align::Right),
        ]));
    blocks.push(Block::Table(header));
    blocks.push(Block::Spacer(12.0));

    // Company info
    blocks.push(paragraph(&style.address_line, styles.body));
    blocks.push(paragraph(&style.contact_line, styles.body));
    blocks.push(Block::Spacer(20.0));

    // Invoice metadata
    let label = TextStyle { color: styles.brand, ..styles.body };
    let meta_padding = Padding::CELL.with_bottom(4.0);
    let mut meta = Table::new("meta", vec![80.0, 200.0]);
    for (name, value) in [
        ("Date:", format_date(invoice.issue_date)),
        ("Due:", format_date(invoice.due_date)),
        ("Status:", clean(&invoice.status)),
    ] {
        meta = meta.row(
            Row::new(vec![Cell::text(name, label), Cell::text(value, styles.body)])
                .with_padding(meta_padding),
        );
    }
    blocks.push(Block::Table(meta));
    blocks.push(Block::Spacer(16.0));

    // Bill to
    blocks.push(Block::Paragraph(Paragraph::new("Bill To:", styles.heading)));
    blocks.push(paragraph(&invoice.client_name, styles.body));
    if let Some(email) = invoice.email() {
        blocks.push(paragraph(&format!("Email: {email}"), styles.body));
    }
    blocks.push(Block::Spacer(16.0));

    // Line items
    blocks.push(Block::Table(items_table(invoice, items, &styles)));
    blocks.push(Block::Spacer(20.0));

    // Totals
    blocks.push(Block::Table(totals_table(&totals, &styles)));
    blocks.push(Block::Spacer(20.0));

    // Payment instructions
    blocks.push(Block::Paragraph(Paragraph::new("Payment Instructions", styles.heading)));
    blocks.push(paragraph(&style.bank_details, styles.body));
    blocks.push(Block::Spacer(16.0));

    // Notes
    if let Some(notes) = invoice.notes() {
        blocks.push(Block::Paragraph(Paragraph::new("Notes", styles.heading)));
        blocks.push(Block::Paragraph(Paragraph::new(sanitize(notes, true), styles.body)));
        blocks.push(Block::Spacer(16.0));
    }

    // Footer
    blocks.push(Block::Spacer(30.0));
    let bar = Table::new("footer", vec![540.0])
        .with_valign(VAlign::Middle)
        .row(
            Row::new(vec![Cell::text(THANK_YOU, TextStyle { color: Rgb::WHITE, ..styles.body })
                .align(Align::Center)])
            .with_background(styles.brand)
            .with_min_height(20.0),
        );
    blocks.push(Block::Table(bar));
    blocks.push(Block::Paragraph(Paragraph::new(
        format!("Generated on {}", format_timestamp(generated_at)),
        styles.small_grey,
    )));

    blocks
}

fn items_table(invoice: &Invoice, items: &[InvoiceItem], styles: &Styles) -> Table {
    let header_style = styles.bold(10.0, Rgb::WHITE).with_leading(12.0);
    let header = Row::new(
        ITEM_HEADERS
            .iter()
            .map(|title| Cell::text(*title, header_style))
            .collect(),
    )
    .with_background(styles.brand)
    .with_padding(Padding::CELL.with_bottom(8.0));

    let mut table = Table::new("items", vec![260.0, 60.0, 80.0, 80.0])
        .with_header_rows(1)
        .with_grid(Stroke { width: 0.5, color: Rgb::GREY })
        .row(header);

    let stripes = [Rgb::WHITE_SMOKE, Rgb::LIGHT_GREY];
    for (index, row) in item_rows(invoice, items).into_iter().enumerate() {
        let body = styles.body;
        table = table.row(
            Row::new(vec![
                Cell::text(sanitize(&row.description, false), body),
                Cell::text(row.quantity, body).align(Align::Center),
                Cell::text(row.unit_price, body).align(Align::Center),
                Cell::text(row.line_total, body).align(Align::Center),
            ])
            .with_background(stripes[index % stripes.len()]),
        );
    }
    table
}

fn totals_table(totals: &Totals, styles: &Styles) -> Table {
    let emphasis = styles.bold(12.0, styles.brand);
    let value = |amount: f64, style: TextStyle| Cell::text(format_currency(amount), style).align(Align::Right);

    Table::new("totals", vec![360.0, 120.0])
        .row(Row::new(vec![
            Cell::text("Subtotal", styles.body),
            value(totals.subtotal, styles.body),
        ]))
        .row(Row::new(vec![
            Cell::text(TAX_LABEL, styles.body),
            value(totals.tax, styles.body),
        ]))
        .row(
            Row::new(vec![Cell::text("Total", emphasis), value(totals.total, emphasis)])
                .with_rule_above(Stroke { width: 1.0, color: styles.brand }),
        )
}

fn paragraph(text: &str, style: TextStyle) -> Block {
    Block::Paragraph(Paragraph::new(clean(text), style))
}

/// Single-line user text
fn clean(text: &str) -> String {
    sanitize(text, false)
}
