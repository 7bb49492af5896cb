//! InvoicePro: invoice bookkeeping with a deterministic PDF renderer.
//!
//! The [`render`] module turns an [`models::Invoice`] and its line items into
//! a paginated PDF. Everything else (persistence, reports, the file generator)
//! exists to feed it or to summarize the stored invoices.

pub mod config;
pub mod db;
pub mod invoice_gen;
pub mod logging;
pub mod models;
pub mod render;
pub mod reports;
