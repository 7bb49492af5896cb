mod seed;

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{Invoice, InvoiceDraft, InvoiceItem, STATUS_PAID};

pub use seed::demo_drafts;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_name TEXT NOT NULL,
    client_email TEXT,
    description TEXT,
    issue_date TEXT,
    due_date TEXT,
    amount REAL NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'Unpaid'
);

CREATE TABLE IF NOT EXISTS invoice_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_id INTEGER NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    quantity REAL NOT NULL DEFAULT 1,
    price REAL NOT NULL DEFAULT 0,
    tax REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_invoice_items_invoice ON invoice_items(invoice_id);
"#;

const INVOICE_COLUMNS: &str =
    "id, client_name, client_email, description, issue_date, due_date, amount, status";

/// Database connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new Database instance from the configured URL
    pub async fn new(config: &Config) -> Result<Self> {
        Self::connect(config.database_url()).await
    }

    /// Open (creating if needed) the database at `url` and ensure the schema exists
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to :memory: is its own database, so keep exactly one
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .await
            .context("failed to initialize schema")?;

        debug!(url, "database ready");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All invoices, oldest issue date first; undated invoices last, newest first
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             ORDER BY issue_date IS NULL, issue_date ASC, id DESC"
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .fetch_all(self.get_pool())
            .await?;

        Ok(invoices)
    }

    /// The `limit` most recently created invoices
    pub async fn recent_invoices(&self, limit: i64) -> Result<Vec<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY id DESC LIMIT ?");
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(limit)
            .fetch_all(self.get_pool())
            .await?;

        Ok(invoices)
    }

    pub async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?");
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(invoice)
    }

    /// Line items of an invoice in entry order
    pub async fn get_items(&self, invoice_id: i64) -> Result<Vec<InvoiceItem>> {
        let items = sqlx::query_as::<_, InvoiceItem>(
            "SELECT id, invoice_id, description, quantity, price, tax \
             FROM invoice_items WHERE invoice_id = ? ORDER BY id ASC",
        )
        .bind(invoice_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(items)
    }

    pub async fn get_invoice_with_items(&self, id: i64) -> Result<Option<(Invoice, Vec<InvoiceItem>)>> {
        let Some(invoice) = self.get_invoice(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(id).await?;
        Ok(Some((invoice, items)))
    }

    /// Insert an invoice and its non-blank items, returning the new id
    pub async fn create_invoice(&self, draft: &InvoiceDraft) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO invoices (client_name, client_email, description, issue_date, due_date, amount, status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.client_name)
        .bind(&draft.client_email)
        .bind(&draft.description)
        .bind(draft.issue_date)
        .bind(draft.due_date)
        .bind(draft.stored_amount())
        .bind(&draft.status)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_items(&mut *tx, id, draft).await?;

        tx.commit().await?;

        info!(id, client = %draft.client_name, "created invoice");
        Ok(id)
    }

    /// Replace an invoice's fields and all of its items.
    ///
    /// Returns `false` when no invoice has the id.
    pub async fn update_invoice(&self, id: i64, draft: &InvoiceDraft) -> Result<bool> {
        // Start a transaction
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE invoices
            SET client_name = ?, client_email = ?, description = ?,
                issue_date = ?, due_date = ?, amount = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&draft.client_name)
        .bind(&draft.client_email)
        .bind(&draft.description)
        .bind(draft.issue_date)
        .bind(draft.due_date)
        .bind(draft.stored_amount())
        .bind(&draft.status)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        // Remove old items
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_items(&mut *tx, id, draft).await?;

        // Commit the transaction
        tx.commit().await?;

        info!(id, "updated invoice");
        Ok(true)
    }

    /// Mark an invoice paid, dating it `today` if it was never issued
    pub async fn mark_paid(&self, id: i64, today: NaiveDate) -> Result<bool> {
        let updated = sqlx::query(
            "UPDATE invoices SET status = ?, issue_date = COALESCE(issue_date, ?) WHERE id = ?",
        )
        .bind(STATUS_PAID)
        .bind(today)
        .bind(id)
        .execute(self.get_pool())
        .await?
        .rows_affected();

        if updated > 0 {
            info!(id, "marked invoice paid");
        }
        Ok(updated > 0)
    }

    /// Delete an invoice together with its items
    pub async fn delete_invoice(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // Delete invoice items first
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if deleted > 0 {
            info!(id, "deleted invoice");
        }
        Ok(deleted > 0)
    }

    pub async fn count_invoices(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(self.get_pool())
            .await?;
        Ok(count)
    }

    /// Insert the demo invoices when the database is empty.
    ///
    /// Returns how many invoices were inserted.
    pub async fn seed_demo_data(&self, today: NaiveDate) -> Result<usize> {
        if self.count_invoices().await? > 0 {
            debug!("invoices present, skipping demo data");
            return Ok(0);
        }

        let drafts = demo_drafts(today);
        for draft in &drafts {
            self.create_invoice(draft).await?;
        }

        info!(count = drafts.len(), "seeded demo invoices");
        Ok(drafts.len())
    }
}

async fn insert_items(conn: &mut SqliteConnection, invoice_id: i64, draft: &InvoiceDraft) -> Result<()> {
    for item in draft.billable_items() {
        sqlx::query(
            "INSERT INTO invoice_items (invoice_id, description, quantity, price, tax) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(invoice_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.tax)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
