//! Dashboard and revenue summaries over stored invoices.
//!
//! Everything here is a pure function of the invoices passed in, so the
//! caller decides what was loaded and the results serialize straight to JSON.

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Invoice, STATUS_PAID, STATUS_UNPAID};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Invoices listed on the dashboard
pub const RECENT_LIMIT: usize = 5;
/// Clients shown in the revenue report
pub const TOP_CLIENT_LIMIT: usize = 8;

const UNKNOWN_CLIENT: &str = "Unknown";
const NO_DATA: &str = "No Data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_invoices: usize,
    pub paid_invoices: usize,
    pub unpaid_invoices: usize,
    /// Stored amounts of every invoice, whatever the status
    pub total_revenue: f64,
    pub recent: Vec<Invoice>,
    pub revenue_labels: [&'static str; 12],
    pub revenue_values: [f64; 12],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRevenue {
    pub client: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub monthly_revenue: [f64; 12],
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub top_clients: Vec<ClientRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenueStatus {
    pub labels: [&'static str; 12],
    pub paid: [f64; 12],
    pub unpaid: [f64; 12],
}

/// Headline numbers and the paid revenue chart
pub fn dashboard(invoices: &[Invoice]) -> Dashboard {
    let mut recent: Vec<Invoice> = invoices.to_vec();
    recent.sort_by(|a, b| b.id.cmp(&a.id));
    recent.truncate(RECENT_LIMIT);

    Dashboard {
        total_invoices: invoices.len(),
        paid_invoices: count_status(invoices, STATUS_PAID),
        unpaid_invoices: count_status(invoices, STATUS_UNPAID),
        total_revenue: invoices.iter().map(|inv| inv.amount).sum(),
        recent,
        revenue_labels: MONTH_LABELS,
        revenue_values: paid_by_month(invoices),
    }
}

/// Paid revenue by month, paid vs unpaid counts and the best paying clients
pub fn revenue_report(invoices: &[Invoice]) -> RevenueReport {
    let mut clients: Vec<ClientRevenue> = Vec::new();
    for invoice in invoices.iter().filter(|inv| counts_as_paid(inv)) {
        let name = if invoice.client_name.is_empty() {
            UNKNOWN_CLIENT
        } else {
            invoice.client_name.as_str()
        };
        match clients.iter_mut().find(|c| c.client == name) {
            Some(entry) => entry.revenue += invoice.amount,
            None => clients.push(ClientRevenue {
                client: name.to_string(),
                revenue: invoice.amount,
            }),
        }
    }

    // Stable sort keeps first-seen order between equal totals
    clients.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    clients.truncate(TOP_CLIENT_LIMIT);
    if clients.is_empty() {
        clients.push(ClientRevenue {
            client: NO_DATA.to_string(),
            revenue: 0.0,
        });
    }

    RevenueReport {
        monthly_revenue: paid_by_month(invoices),
        paid_count: count_status(invoices, STATUS_PAID),
        unpaid_count: count_status(invoices, STATUS_UNPAID),
        top_clients: clients,
    }
}

/// Paid and outstanding amounts per month of `year`.
///
/// Unlike the dashboard, "paid" is matched loosely and every other status
/// counts as unpaid.
pub fn monthly_revenue_status(invoices: &[Invoice], year: i32) -> MonthlyRevenueStatus {
    let mut paid = [0.0; 12];
    let mut unpaid = [0.0; 12];

    for invoice in invoices {
        let Some(date) = invoice.issue_date.filter(|d| d.year() == year) else {
            continue;
        };
        let month = date.month0() as usize;
        if invoice.is_paid() {
            paid[month] += invoice.amount;
        } else {
            unpaid[month] += invoice.amount;
        }
    }

    MonthlyRevenueStatus {
        labels: MONTH_LABELS,
        paid,
        unpaid,
    }
}

fn count_status(invoices: &[Invoice], status: &str) -> usize {
    invoices.iter().filter(|inv| inv.status == status).count()
}

/// Dated invoices with the exact "Paid" status
fn counts_as_paid(invoice: &Invoice) -> bool {
    invoice.status == STATUS_PAID && invoice.issue_date.is_some()
}

/// Paid revenue by issue month across all years
fn paid_by_month(invoices: &[Invoice]) -> [f64; 12] {
    let mut months = [0.0; 12];
    for invoice in invoices.iter().filter(|inv| counts_as_paid(inv)) {
        if let Some(date) = invoice.issue_date {
            months[date.month0() as usize] += invoice.amount;
        }
    }
    months
}
