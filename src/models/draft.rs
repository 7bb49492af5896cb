use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use super::invoice::STATUS_UNPAID;
use super::{Invoice, InvoiceItem};

/// Days between issue and due date when no due date is given
pub const DEFAULT_PAYMENT_TERMS_DAYS: i64 = 7;

/// Editable invoice fields, as submitted for create or edit
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub client_name: String,
    pub client_email: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub items: Vec<ItemDraft>,
}

/// One submitted line item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub tax: f64,
}

#[derive(Error, Debug, PartialEq)]
pub enum ItemParseError {
    #[error("expected description:quantity:price[:tax], got {0:?}")]
    Shape(String),
}

impl InvoiceDraft {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            client_email: None,
            description: None,
            issue_date: None,
            due_date: None,
            status: STATUS_UNPAID.to_string(),
            items: Vec::new(),
        }
    }

    /// Rebuild the draft an existing invoice would submit unchanged
    pub fn from_invoice(invoice: &Invoice, items: &[InvoiceItem]) -> Self {
        Self {
            client_name: invoice.client_name.clone(),
            client_email: invoice.client_email.clone(),
            description: invoice.description.clone(),
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            status: invoice.status.clone(),
            items: items
                .iter()
                .map(|item| ItemDraft {
                    description: item.description.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    tax: item.tax,
                })
                .collect(),
        }
    }

    /// Fill the dates a new invoice needs: issued today, due a week later
    pub fn apply_creation_defaults(&mut self, today: NaiveDate) {
        let issue_date = *self.issue_date.get_or_insert(today);
        self.due_date
            .get_or_insert(issue_date + Duration::days(DEFAULT_PAYMENT_TERMS_DAYS));
        if self.status.trim().is_empty() {
            self.status = STATUS_UNPAID.to_string();
        }
    }

    /// Items that will be stored; rows without a description are dropped
    pub fn billable_items(&self) -> impl Iterator<Item = &ItemDraft> {
        self.items
            .iter()
            .filter(|item| !item.description.trim().is_empty())
    }

    /// Amount persisted with the invoice, per-item tax included
    pub fn stored_amount(&self) -> f64 {
        let total: f64 = self.billable_items().map(ItemDraft::taxed_total).sum();
        round_cents(total)
    }
}

impl ItemDraft {
    pub fn new(description: impl Into<String>, quantity: f64, price: f64, tax: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            price,
            tax,
        }
    }

    pub fn taxed_total(&self) -> f64 {
        let subtotal = self.quantity * self.price;
        subtotal * (1.0 + self.tax / 100.0)
    }
}

/// Parses `description:quantity:price[:tax]`.
///
/// The description ends at the first colon. Empty numbers count as zero, and
/// if any number fails to parse all three are zeroed.
impl FromStr for ItemDraft {
    type Err = ItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let description = parts.next().unwrap_or_default().trim().to_string();
        let numbers: Vec<&str> = parts.collect();
        if numbers.len() < 2 || numbers.len() > 3 {
            return Err(ItemParseError::Shape(s.to_string()));
        }

        let parsed: Result<Vec<f64>, _> = numbers
            .iter()
            .map(|n| match n.trim() {
                "" => Ok(0.0),
                n => n.parse::<f64>(),
            })
            .collect();
        let (quantity, price, tax) = match parsed {
            Ok(values) => (values[0], values[1], values.get(2).copied().unwrap_or(0.0)),
            Err(_) => (0.0, 0.0, 0.0),
        };

        Ok(Self::new(description, quantity, price, tax))
    }
}

/// Round half away from zero to two decimal places
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_with_and_without_tax() {
        let item: ItemDraft = "Landing page design:1:600:5".parse().unwrap();
        assert_eq!(item, ItemDraft::new("Landing page design", 1.0, 600.0, 5.0));

        let item: ItemDraft = "CMS setup: 2 : 400".parse().unwrap();
        assert_eq!(item, ItemDraft::new("CMS setup", 2.0, 400.0, 0.0));
    }

    #[test]
    fn bad_numbers_zero_the_whole_item() {
        let item: ItemDraft = "Consulting:two:150:0".parse().unwrap();
        assert_eq!(item, ItemDraft::new("Consulting", 0.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!("just a description".parse::<ItemDraft>().is_err());
        assert!("a:1:2:3:4".parse::<ItemDraft>().is_err());
    }

    #[test]
    fn stored_amount_includes_item_tax_and_skips_blank_rows() {
        let mut draft = InvoiceDraft::new("Alpha Corp");
        draft.items = vec![
            ItemDraft::new("Landing page design", 1.0, 600.0, 5.0),
            ItemDraft::new("CMS setup", 1.0, 400.0, 0.0),
            ItemDraft::new("   ", 10.0, 10.0, 0.0),
        ];

        assert_eq!(draft.billable_items().count(), 2);
        assert_eq!(draft.stored_amount(), 1030.0);
    }

    #[test]
    fn creation_defaults_set_a_week_of_payment_terms() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap();
        let mut draft = InvoiceDraft::new("Beta Ltd");
        draft.status.clear();
        draft.apply_creation_defaults(today);

        assert_eq!(draft.issue_date, Some(today));
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2024, 4, 4));
        assert_eq!(draft.status, STATUS_UNPAID);
    }

    #[test]
    fn creation_defaults_keep_explicit_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut draft = InvoiceDraft::new("Beta Ltd");
        draft.due_date = Some(due);
        draft.apply_creation_defaults(today);

        assert_eq!(draft.due_date, Some(due));
    }
}
