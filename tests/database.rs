//! Persistence tests against an in-memory SQLite database.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use invoice_pro::db::Database;
use invoice_pro::models::{InvoiceDraft, ItemDraft, STATUS_PAID};
use invoice_pro::reports;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn database() -> Database {
    Database::connect("sqlite::memory:").await.unwrap()
}

fn draft(client: &str, issue_date: Option<NaiveDate>) -> InvoiceDraft {
    let mut draft = InvoiceDraft::new(client);
    draft.client_email = Some(format!("{}@example.com", client.to_lowercase()));
    draft.issue_date = issue_date;
    draft.items = vec![
        ItemDraft::new("Design", 2.0, 100.0, 10.0),
        ItemDraft::new("", 5.0, 5.0, 0.0),
        ItemDraft::new("Hosting", 1.0, 30.0, 0.0),
    ];
    draft
}

#[tokio::test]
async fn create_stores_taxed_amount_and_skips_blank_items() {
    let db = database().await;
    let id = db.create_invoice(&draft("Alpha", Some(date(2024, 3, 1)))).await.unwrap();

    let (invoice, items) = db.get_invoice_with_items(id).await.unwrap().unwrap();
    assert_eq!(invoice.client_name, "Alpha");
    assert_eq!(invoice.client_email.as_deref(), Some("alpha@example.com"));
    assert_eq!(invoice.issue_date, Some(date(2024, 3, 1)));
    assert_eq!(invoice.amount, 250.0);
    assert_eq!(invoice.status, "Unpaid");

    let descriptions: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Design", "Hosting"]);
    assert_eq!(items[0].tax, 10.0);
    assert!(items.iter().all(|i| i.invoice_id == id));
}

#[tokio::test]
async fn missing_invoices_are_not_errors() {
    let db = database().await;

    assert!(db.get_invoice(99).await.unwrap().is_none());
    assert!(db.get_invoice_with_items(99).await.unwrap().is_none());
    assert!(!db.mark_paid(99, date(2024, 1, 1)).await.unwrap());
    assert!(!db.delete_invoice(99).await.unwrap());
    assert!(!db.update_invoice(99, &draft("Ghost", None)).await.unwrap());
}

#[tokio::test]
async fn update_replaces_fields_and_items() {
    let db = database().await;
    let id = db.create_invoice(&draft("Alpha", Some(date(2024, 3, 1)))).await.unwrap();

    let mut changed = InvoiceDraft::new("Alpha Holdings");
    changed.issue_date = Some(date(2024, 3, 2));
    changed.items = vec![ItemDraft::new("Retainer", 1.0, 500.0, 0.0)];
    assert!(db.update_invoice(id, &changed).await.unwrap());

    let (invoice, items) = db.get_invoice_with_items(id).await.unwrap().unwrap();
    assert_eq!(invoice.client_name, "Alpha Holdings");
    assert_eq!(invoice.client_email, None);
    assert_eq!(invoice.amount, 500.0);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description, "Retainer");
}

#[tokio::test]
async fn mark_paid_dates_undated_invoices() {
    let db = database().await;
    let undated = db.create_invoice(&draft("Beta", None)).await.unwrap();
    let dated = db.create_invoice(&draft("Gamma", Some(date(2024, 2, 1)))).await.unwrap();
    let today = date(2024, 6, 15);

    assert!(db.mark_paid(undated, today).await.unwrap());
    assert!(db.mark_paid(dated, today).await.unwrap());

    let undated = db.get_invoice(undated).await.unwrap().unwrap();
    assert_eq!(undated.status, STATUS_PAID);
    assert_eq!(undated.issue_date, Some(today));

    let dated = db.get_invoice(dated).await.unwrap().unwrap();
    assert_eq!(dated.issue_date, Some(date(2024, 2, 1)));
}

#[tokio::test]
async fn delete_removes_items_too() {
    let db = database().await;
    let id = db.create_invoice(&draft("Delta", None)).await.unwrap();

    assert!(db.delete_invoice(id).await.unwrap());
    assert!(db.get_invoice(id).await.unwrap().is_none());
    assert!(db.get_items(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_orders_by_issue_date_with_undated_last() {
    let db = database().await;
    let late = db.create_invoice(&draft("Late", Some(date(2024, 5, 1)))).await.unwrap();
    let undated_a = db.create_invoice(&draft("UndatedA", None)).await.unwrap();
    let early = db.create_invoice(&draft("Early", Some(date(2024, 1, 1)))).await.unwrap();
    let undated_b = db.create_invoice(&draft("UndatedB", None)).await.unwrap();

    let ids: Vec<i64> = db.list_invoices().await.unwrap().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![early, late, undated_b, undated_a]);

    let recent: Vec<i64> = db.recent_invoices(2).await.unwrap().iter().map(|i| i.id).collect();
    assert_eq!(recent, vec![undated_b, early]);
}

#[tokio::test]
async fn seeding_only_fills_an_empty_database() {
    let db = database().await;
    let today = date(2024, 6, 20);

    assert_eq!(db.seed_demo_data(today).await.unwrap(), 5);
    assert_eq!(db.seed_demo_data(today).await.unwrap(), 0);
    assert_eq!(db.count_invoices().await.unwrap(), 5);

    let invoices = db.list_invoices().await.unwrap();
    let dashboard = reports::dashboard(&invoices);
    assert_eq!(dashboard.paid_invoices, 3);
    assert_eq!(dashboard.unpaid_invoices, 2);
    assert_eq!(dashboard.total_revenue, 6099.0);

    let report = reports::revenue_report(&invoices);
    assert_eq!(report.top_clients[0].client, "Gamma Inc");
    assert_eq!(report.top_clients[0].revenue, 2520.0);
}
