use serde::Serialize;

use crate::models::{Invoice, InvoiceItem};

/// Flat rate applied once to the subtotal.
///
/// Per-item tax rates are stored with each line but do not enter the
/// rendered totals.
pub const TAX_RATE: f64 = 0.10;

/// Label of the tax row, kept in step with [`TAX_RATE`]
pub const TAX_LABEL: &str = "Tax (10%)";

/// Amounts printed in the totals block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    /// Sum the line totals, falling back to the stored amount when the
    /// invoice has no items
    pub fn compute(invoice: &Invoice, items: &[InvoiceItem]) -> Self {
        let subtotal = if items.is_empty() {
            invoice.amount
        } else {
            items.iter().map(InvoiceItem::line_total).sum()
        };
        Self::from_subtotal(subtotal)
    }

    pub fn from_subtotal(subtotal: f64) -> Self {
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// `$` followed by the amount with exactly two decimals
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Quantity as a float literal: `2.0`, `1.5`
pub fn format_quantity(quantity: f64) -> String {
    if quantity.is_finite() && quantity.fract() == 0.0 && quantity.abs() < 1e16 {
        format!("{quantity:.1}")
    } else {
        format!("{quantity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, price: f64, tax: f64) -> InvoiceItem {
        InvoiceItem {
            description: "Work".to_string(),
            quantity,
            price,
            tax,
            ..Default::default()
        }
    }

    #[test]
    fn sums_line_totals_and_adds_flat_tax() {
        let invoice = Invoice::default();
        let totals = Totals::compute(&invoice, &[item(2.0, 10.0, 5.0), item(1.0, 50.0, 0.0)]);

        assert!((totals.subtotal - 70.0).abs() < 1e-9);
        assert!((totals.tax - 7.0).abs() < 1e-9);
        assert!((totals.total - 77.0).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_stored_amount_without_items() {
        let invoice = Invoice {
            amount: 199.0,
            ..Default::default()
        };
        let totals = Totals::compute(&invoice, &[]);

        assert_eq!(format_currency(totals.subtotal), "$199.00");
        assert_eq!(format_currency(totals.tax), "$19.90");
        assert_eq!(format_currency(totals.total), "$218.90");
    }

    #[test]
    fn stored_amount_is_ignored_when_items_exist() {
        let invoice = Invoice {
            amount: 1000.0,
            ..Default::default()
        };
        let totals = Totals::compute(&invoice, &[item(1.0, 10.0, 0.0)]);
        assert!((totals.subtotal - 10.0).abs() < 1e-9);
    }

    #[test]
    fn formats_numbers() {
        assert_eq!(format_currency(1234.5), "$1234.50");
        assert_eq!(format_currency(-5.0), "$-5.00");
        assert_eq!(format_quantity(2.0), "2.0");
        assert_eq!(format_quantity(60.0), "60.0");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.25), "0.25");
    }
}
