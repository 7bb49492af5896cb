//! Demo invoices for an empty database

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{InvoiceDraft, ItemDraft, STATUS_PAID, STATUS_UNPAID};

struct DemoInvoice {
    client_name: &'static str,
    client_email: &'static str,
    description: &'static str,
    /// Months before the current one, clamped to January
    months_back: u32,
    /// Day of month, clamped to today when the invoice is in the current month
    day: u32,
    days_due: i64,
    status: &'static str,
    items: &'static [(&'static str, f64, f64, f64)],
}

const DEMO_INVOICES: &[DemoInvoice] = &[
    DemoInvoice {
        client_name: "Alpha Corp",
        client_email: "alpha@example.com",
        description: "Website design + small CMS",
        months_back: 4,
        day: 12,
        days_due: 14,
        status: STATUS_PAID,
        items: &[("Landing page design", 1.0, 600.0, 5.0), ("CMS setup", 1.0, 400.0, 0.0)],
    },
    DemoInvoice {
        client_name: "Beta Ltd",
        client_email: "beta@example.com",
        description: "SEO & content",
        months_back: 3,
        day: 6,
        days_due: 30,
        status: STATUS_UNPAID,
        items: &[("SEO package (3 months)", 1.0, 750.0, 0.0)],
    },
    DemoInvoice {
        client_name: "Gamma Inc",
        client_email: "gamma@example.com",
        description: "Mobile App MVP",
        months_back: 2,
        day: 3,
        days_due: 30,
        status: STATUS_PAID,
        items: &[("iOS development (hrs)", 60.0, 20.0, 10.0), ("Backend API", 1.0, 1200.0, 0.0)],
    },
    DemoInvoice {
        client_name: "Delta Co",
        client_email: "delta@example.com",
        description: "Branding & logo",
        months_back: 1,
        day: 18,
        days_due: 10,
        status: STATUS_PAID,
        items: &[("Branding package", 1.0, 1500.0, 0.0)],
    },
    DemoInvoice {
        client_name: "Epsilon Partners",
        client_email: "eps@partners.com",
        description: "Maintenance & support",
        months_back: 0,
        day: 10,
        days_due: 7,
        status: STATUS_UNPAID,
        items: &[("Monthly maintenance", 1.0, 199.0, 0.0), ("Emergency support (hrs)", 2.0, 50.0, 0.0)],
    },
];

/// Drafts for the demo invoices, dated relative to `today` within its year
pub fn demo_drafts(today: NaiveDate) -> Vec<InvoiceDraft> {
    DEMO_INVOICES
        .iter()
        .map(|demo| {
            let month = today.month().saturating_sub(demo.months_back).max(1);
            let day = if demo.months_back == 0 { demo.day.min(today.day()) } else { demo.day };
            let issue_date = NaiveDate::from_ymd_opt(today.year(), month, day).unwrap_or(today);

            InvoiceDraft {
                client_name: demo.client_name.to_string(),
                client_email: Some(demo.client_email.to_string()),
                description: Some(demo.description.to_string()),
                issue_date: Some(issue_date),
                due_date: Some(issue_date + Duration::days(demo.days_due)),
                status: demo.status.to_string(),
                items: demo
                    .items
                    .iter()
                    .map(|(description, quantity, price, tax)| {
                        ItemDraft::new(*description, *quantity, *price, *tax)
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_dates_stay_in_the_current_year() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let drafts = demo_drafts(today);

        let issued: Vec<NaiveDate> = drafts.iter().filter_map(|d| d.issue_date).collect();
        assert_eq!(
            issued,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            ]
        );
        assert_eq!(drafts[0].due_date, NaiveDate::from_ymd_opt(2024, 1, 26));
    }

    #[test]
    fn demo_amounts_include_item_tax() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        let amounts: Vec<f64> = demo_drafts(today).iter().map(InvoiceDraft::stored_amount).collect();
        assert_eq!(amounts, vec![1030.0, 750.0, 2520.0, 1500.0, 299.0]);
    }
}
