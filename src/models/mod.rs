mod draft;
mod invoice;
mod invoice_item;

pub use draft::{round_cents, InvoiceDraft, ItemDraft, ItemParseError, DEFAULT_PAYMENT_TERMS_DAYS};
pub use invoice::{Invoice, STATUS_PAID, STATUS_UNPAID};
pub use invoice_item::InvoiceItem;
