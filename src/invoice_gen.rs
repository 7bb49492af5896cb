use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::models::{Invoice, InvoiceItem};
use crate::render::{
    self, escape_markdown, format_currency, format_date, format_timestamp, item_rows, DocumentStyle, Logo,
    Totals, ITEM_HEADERS, TAX_LABEL, THANK_YOU,
};

/// Service for generating invoice files in PDF and Markdown format
pub struct InvoiceGenerator {
    output_dir: PathBuf,
}

impl InvoiceGenerator {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        // Create the output directory if it doesn't exist
        let path = output_dir.as_ref();
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create output directory {}", path.display()))?;

        Ok(Self {
            output_dir: path.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `invoice_<id>.md` and `invoice_<id>.pdf`, returning both paths
    pub fn generate_invoice(
        &self,
        invoice: &Invoice,
        items: &[InvoiceItem],
        style: &DocumentStyle,
        generated_at: NaiveDateTime,
    ) -> Result<(PathBuf, PathBuf)> {
        // Create file names
        let md_path = self.output_dir.join(format!("invoice_{}.md", invoice.id));
        let pdf_path = self.output_dir.join(format!("invoice_{}.pdf", invoice.id));

        // A broken logo only costs the image
        let logo = match style.logo_path.as_deref() {
            Some(path) => match Logo::load(path) {
                Ok(logo) => Some(logo),
                Err(err) => {
                    warn!(error = %err, "logo unavailable, using company name");
                    None
                }
            },
            None => None,
        };

        render::render_to_file(invoice, items, style, logo.as_ref(), generated_at, &pdf_path)
            .with_context(|| format!("failed to render invoice {}", invoice.id))?;

        let markdown = generate_markdown(invoice, items, style, generated_at);
        fs::write(&md_path, markdown)
            .with_context(|| format!("failed to write {}", md_path.display()))?;

        info!(id = invoice.id, pdf = %pdf_path.display(), "generated invoice");
        Ok((md_path, pdf_path))
    }
}

/// Markdown summary with the same sections and totals as the PDF.
///
/// Every piece of user text is escaped, so it can never become markup.
pub fn generate_markdown(
    invoice: &Invoice,
    items: &[InvoiceItem],
    style: &DocumentStyle,
    generated_at: NaiveDateTime,
) -> String {
    let totals = Totals::compute(invoice, items);
    let mut content = String::new();

    // Header and company info
    let _ = writeln!(content, "# {}\n", escape_markdown(&style.company_name));
    let _ = writeln!(content, "{}  ", escape_markdown(&style.address_line));
    let _ = writeln!(content, "{}\n", escape_markdown(&style.contact_line));
    let _ = writeln!(content, "## INVOICE {}\n", invoice.id);

    // Invoice metadata
    let _ = writeln!(content, "**Date:** {}  ", format_date(invoice.issue_date));
    let _ = writeln!(content, "**Due:** {}  ", format_date(invoice.due_date));
    let _ = writeln!(content, "**Status:** {}\n", escape_markdown(&invoice.status));

    // Bill to
    content.push_str("### Bill To\n\n");
    let _ = writeln!(content, "{}  ", escape_markdown(&invoice.client_name));
    if let Some(email) = invoice.email() {
        let _ = writeln!(content, "Email: {}  ", escape_markdown(email));
    }
    content.push('\n');

    // Line items
    let _ = writeln!(content, "| {} |", ITEM_HEADERS.join(" | "));
    content.push_str("| :--- | :---: | :---: | :---: |\n");
    for row in item_rows(invoice, items) {
        let _ = writeln!(
            content,
            "| {} | {} | {} | {} |",
            escape_markdown(&row.description),
            row.quantity,
            row.unit_price,
            row.line_total
        );
    }
    content.push('\n');

    // Totals
    let _ = writeln!(content, "Subtotal: {}  ", format_currency(totals.subtotal));
    let _ = writeln!(content, "{}: {}  ", escape_markdown(TAX_LABEL), format_currency(totals.tax));
    let _ = writeln!(content, "**Total: {}**\n", format_currency(totals.total));

    // Payment instructions
    content.push_str("### Payment Instructions\n\n");
    let _ = writeln!(content, "{}\n", escape_markdown(&style.bank_details));

    // Notes
    if let Some(notes) = invoice.notes() {
        content.push_str("### Notes\n\n");
        for line in notes.lines() {
            let _ = writeln!(content, "{}  ", escape_markdown(line));
        }
        content.push('\n');
    }

    let _ = writeln!(content, "---\n\n{THANK_YOU}\n");
    let _ = writeln!(content, "_Generated on {}_", format_timestamp(generated_at));

    content
}
