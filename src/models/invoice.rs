use chrono::NaiveDate;
use serde::Serialize;

/// Status written by `mark_paid`
pub const STATUS_PAID: &str = "Paid";
/// Status given to new invoices when none is supplied
pub const STATUS_UNPAID: &str = "Unpaid";

#[derive(sqlx::FromRow, Debug, Clone, Default, PartialEq, Serialize)]
pub struct Invoice {
    pub id: i64,
    pub client_name: String,
    pub client_email: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Stored total, including per-item tax
    pub amount: f64,
    pub status: String,
}

impl Invoice {
    /// Client email, if a non-empty one is stored
    pub fn email(&self) -> Option<&str> {
        non_empty(self.client_email.as_deref())
    }

    /// Free-form notes, if non-empty text is stored.
    ///
    /// Whitespace counts as text; only `None` and `""` are absent.
    pub fn notes(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    /// Loose status check used by the revenue charts
    pub fn is_paid(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(STATUS_PAID)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
